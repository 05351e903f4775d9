//! Tile rendering: a finite, restartable sequence of display segments, plus a
//! text mapping for terminals and a PNG raster export.
//!
//! A frame is emitted in row-major order, two text lines per maze row (the
//! wall line above the cells, then the cell line) followed by one bottom
//! wall line. Every line holds `2 * width + 1` segments and is closed by
//! `Newline`; the frame is closed by `EndOfFrame`.

use std::path::Path;
use std::vec;

use crate::directions::Direction;
use crate::errors::*;
use crate::tile::{Point, Tile};

/// One unit of a rendered frame. Doors carry their side so a display can
/// paint each of the four differently.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Segment {
    Wall,
    Path,
    Cursor,
    DoorUp,
    DoorDown,
    DoorLeft,
    DoorRight,
    Newline,
    EndOfFrame,
}

/// The finite segment sequence of one frame. Restart a render by asking the
/// tile for a fresh iterator.
pub struct Segments {
    inner: vec::IntoIter<Segment>,
}

impl Iterator for Segments {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Lay out one frame of the given tile.
pub fn segments(tile: &Tile) -> Segments {
    let (width, height) = (tile.width(), tile.height());
    let columns = 2 * width + 1;
    let lines = 2 * height + 1;
    let mut frame = Vec::with_capacity(lines * (columns + 1) + 1);

    let door_column = (width / 2) as isize;
    let door_row = (height / 2) as isize;

    for y in 0..height as isize {
        // Wall line above this cell row. The top door replaces the wall
        // segment over the middle column of the first row.
        frame.push(Segment::Wall);
        for x in 0..width as isize {
            let cell = Point::new(x, y);
            if tile.has_passage(cell, Direction::Up) {
                frame.push(Segment::Path);
            } else if y == 0 && x == door_column {
                frame.push(Segment::DoorUp);
            } else {
                frame.push(Segment::Wall);
            }
            frame.push(Segment::Wall);
        }
        frame.push(Segment::Newline);

        // Cell line: cell bodies alternating with their east walls; the side
        // doors replace the outer walls of the middle row.
        frame.push(if y == door_row {
            Segment::DoorLeft
        } else {
            Segment::Wall
        });
        for x in 0..width as isize {
            let cell = Point::new(x, y);
            frame.push(if tile.cursor() == cell {
                Segment::Cursor
            } else {
                Segment::Path
            });
            if tile.has_passage(cell, Direction::Right) {
                frame.push(Segment::Path);
            } else if y == door_row && x == width as isize - 1 {
                frame.push(Segment::DoorRight);
            } else {
                frame.push(Segment::Wall);
            }
        }
        frame.push(Segment::Newline);
    }

    // Bottom wall line with the bottom door under the middle column.
    frame.push(Segment::Wall);
    for x in 0..width as isize {
        frame.push(if x == door_column {
            Segment::DoorDown
        } else {
            Segment::Wall
        });
        frame.push(Segment::Wall);
    }
    frame.push(Segment::Newline);
    frame.push(Segment::EndOfFrame);

    Segments {
        inner: frame.into_iter(),
    }
}

/// How each segment paints as text.
#[derive(Debug)]
pub struct Format {
    pub wall: &'static str,
    pub path: &'static str,
    pub cursor: &'static str,
    pub door_up: &'static str,
    pub door_down: &'static str,
    pub door_left: &'static str,
    pub door_right: &'static str,
}

/// Plain characters, two per segment, for dumb terminals and files.
pub const ASCII: Format = Format {
    wall: "##",
    path: "  ",
    cursor: "@@",
    door_up: "^^",
    door_down: "VV",
    door_left: "<<",
    door_right: ">>",
};

/// ANSI colours: inverse-video floor, green doors, a yellow cursor.
pub const ANSI: Format = Format {
    wall: "  ",
    path: "\x1b[7m  \x1b[0m",
    cursor: "\x1b[43;1m@@\x1b[0m",
    door_up: "\x1b[42;1m^^\x1b[0m",
    door_down: "\x1b[42;1mVV\x1b[0m",
    door_left: "\x1b[42;1m<<\x1b[0m",
    door_right: "\x1b[42;1m>>\x1b[0m",
};

impl Format {
    pub fn text(&self, segment: Segment) -> &'static str {
        match segment {
            Segment::Wall => self.wall,
            Segment::Path => self.path,
            Segment::Cursor => self.cursor,
            Segment::DoorUp => self.door_up,
            Segment::DoorDown => self.door_down,
            Segment::DoorLeft => self.door_left,
            Segment::DoorRight => self.door_right,
            Segment::Newline => "\n",
            Segment::EndOfFrame => "",
        }
    }
}

/// The whole frame as one string in the given format.
pub fn render_text(tile: &Tile, format: &Format) -> String {
    segments(tile).map(|segment| format.text(segment)).collect()
}

const WALL_COLOUR: [u8; 4] = [0, 0, 0, 255];
const FLOOR_COLOUR: [u8; 4] = [119, 136, 153, 255];
const DOOR_COLOUR: [u8; 4] = [0, 255, 0, 255];
const CURSOR_COLOUR: [u8; 4] = [255, 215, 0, 255];

/// Rasterize one frame, each segment painted as a `cell_pixels` square block.
pub fn render_image(tile: &Tile, cell_pixels: usize) -> image::RgbaImage {
    let columns = 2 * tile.width() + 1;
    let lines = 2 * tile.height() + 1;
    let mut img = image::ImageBuffer::new(
        (columns * cell_pixels) as u32,
        (lines * cell_pixels) as u32,
    );

    let (mut column, mut line) = (0, 0);
    for segment in segments(tile) {
        match segment {
            Segment::Newline => {
                line += 1;
                column = 0;
            }
            Segment::EndOfFrame => break,
            _ => {
                plot(&mut img, column, line, cell_pixels, colour(segment));
                column += 1;
            }
        }
    }

    img
}

/// Render the tile and write it to `path` as a PNG.
pub fn save_png(tile: &Tile, path: &Path, cell_pixels: usize) -> Result<()> {
    let img = render_image(tile, cell_pixels);
    let (width, height) = img.dimensions();
    image::save_buffer(path, &img, width, height, image::ColorType::RGBA(8))
        .chain_err(|| format!("failed to write tile image to {}", path.display()))
}

fn colour(segment: Segment) -> image::Rgba<u8> {
    let data = match segment {
        Segment::Wall => WALL_COLOUR,
        Segment::Cursor => CURSOR_COLOUR,
        Segment::DoorUp | Segment::DoorDown | Segment::DoorLeft | Segment::DoorRight => DOOR_COLOUR,
        _ => FLOOR_COLOUR,
    };
    image::Rgba { data: data }
}

fn plot(img: &mut image::RgbaImage, column: usize, line: usize, scale: usize, colour: image::Rgba<u8>) {
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(
                (column * scale + dx) as u32,
                (line * scale + dy) as u32,
                colour,
            );
        }
    }
}
