use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use docopt::Docopt;
use serde_derive::Deserialize;

use mazefabric::{
    directions::Direction,
    fabric::Fabric,
    renderers,
    units::{Height, Width},
};

const USAGE: &str = "Maze fabric driver

Usage:
    mazefabric_driver -h | --help
    mazefabric_driver [(--tile-size=<n>|[--tile-width=<w> --tile-height=<h>])] [--seed=<n>] [--moves=<dirs>] [--ascii] [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>]

Options:
    -h --help           Show this screen.
    --tile-size=<n>     Square tiles of n * n cells.
    --tile-width=<w>    Tile width in cells [default: 25].
    --tile-height=<h>   Tile height in cells [default: 25].
    --seed=<n>          Seed for the carving random stream. Taken from the clock when absent.
    --moves=<dirs>      Cursor moves to replay before rendering, as a string of u/d/l/r characters.
    --ascii             Render with plain ASCII characters instead of ANSI colours.
    --text-out=<path>   Write the textual rendering to a file instead of stdout.
    --image-out=<path>  Also write a PNG rendering of the current tile.
    --cell-pixels=<n>   Pixel count to render one segment of the image [default: 10].
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_tile_size: Option<usize>,
    flag_tile_width: usize,
    flag_tile_height: usize,
    flag_seed: Option<u64>,
    flag_moves: String,
    flag_ascii: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: usize,
}

mod errors {
    use error_chain::*;

    error_chain! {

        links {
            Fabric(::mazefabric::errors::Error, ::mazefabric::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(size) = args.flag_tile_size {
        (size, size)
    } else {
        (args.flag_tile_width, args.flag_tile_height)
    };
    let seed = args.flag_seed.unwrap_or_else(seed_from_clock);

    let mut fabric = Fabric::new(Height(height), Width(width), seed)?;
    for direction in parse_moves(&args.flag_moves)? {
        fabric.move_cursor(direction);
    }

    let format = if args.flag_ascii {
        &renderers::ASCII
    } else {
        &renderers::ANSI
    };
    let rendering = renderers::render_text(fabric.current_tile(), format);

    if args.flag_text_out.is_empty() {
        print!("{}", rendering);
        println!("tile {}  seed {}", fabric.current_position(), seed);
    } else {
        write_text_to_file(&rendering, &args.flag_text_out)
            .chain_err(|| format!("Failed to write rendering to {}", args.flag_text_out))?;
    }

    if !args.flag_image_out.is_empty() {
        renderers::save_png(
            fabric.current_tile(),
            Path::new(&args.flag_image_out),
            args.flag_cell_pixels,
        )?;
    }

    Ok(())
}

/// A `u/d/l/r` string (case insensitive) as a replayable move sequence.
fn parse_moves(moves: &str) -> Result<Vec<Direction>> {
    moves
        .chars()
        .map(|c| match c.to_ascii_lowercase() {
            'u' => Ok(Direction::Up),
            'd' => Ok(Direction::Down),
            'l' => Ok(Direction::Left),
            'r' => Ok(Direction::Right),
            other => Err(format!("unknown move character '{}', expected u/d/l/r", other).into()),
        })
        .collect()
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
        .unwrap_or(0x5eed)
}

fn write_text_to_file(data: &str, file_name: &str) -> std::io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
