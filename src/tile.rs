use std::fmt;

use itertools::Itertools;

use crate::directions::{Direction, DirectionSmallVec, Passages, DIRECTIONS};
use crate::units::{Height, Width};

/// Cell coordinate local to one tile. Exits deliberately sit one step outside
/// the `[0, width) x [0, height)` bounds, so the components are signed.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct Point {
    pub x: isize,
    pub y: isize,
}

impl Point {
    pub fn new(x: isize, y: isize) -> Point {
        Point { x: x, y: y }
    }

    /// The point one step away in the given direction. Pure translation, no
    /// bounds knowledge.
    #[inline]
    pub fn advance(&self, direction: Direction) -> Point {
        let (dx, dy) = direction.delta();
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A tile's coordinate on the infinite tile grid (not a cell coordinate).
///
/// Grid north is `y + 1`: crossing the top door of a tile lands on the tile
/// one position up the y axis. Formats as the `"x,y"` key that outside layers
/// (e.g. a session store) use to identify a tile.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct GridPosition {
    pub x: i64,
    pub y: i64,
}

impl GridPosition {
    pub fn new(x: i64, y: i64) -> GridPosition {
        GridPosition { x: x, y: y }
    }

    /// The neighbouring grid position reached by crossing a door this way.
    pub fn shifted(self, direction: Direction) -> GridPosition {
        match direction {
            Direction::Up => GridPosition { y: self.y + 1, ..self },
            Direction::Down => GridPosition { y: self.y - 1, ..self },
            Direction::Left => GridPosition { x: self.x - 1, ..self },
            Direction::Right => GridPosition { x: self.x + 1, ..self },
        }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One fixed-size maze unit of the fabric.
///
/// Owns its cell grid (a row-major vector of passage masks) plus the four
/// door points on its edge midpoints and the cursor of whoever is inside it.
/// Neighbour tiles are referenced by grid position only; the registry owns
/// every tile, so the cycles the tile graph forms need no special handling.
#[derive(Debug)]
pub struct Tile {
    cells: Vec<Passages>,
    width: usize,
    height: usize,
    position: GridPosition,
    exits: [Point; 4],
    cursor: Point,
    neighbours: [Option<GridPosition>; 4],
}

impl Tile {
    /// A tile with no passages carved yet, its cursor on the centre cell and
    /// one door at the midpoint of each side, one step outside the bounds.
    pub fn new(height: Height, width: Width, position: GridPosition) -> Tile {
        let (Height(height), Width(width)) = (height, width);
        let (w, h) = (width as isize, height as isize);

        Tile {
            cells: vec![Passages::none(); width * height],
            width: width,
            height: height,
            position: position,
            // One slot per direction, in DIRECTIONS order.
            exits: [
                Point::new(w / 2, -1),
                Point::new(w / 2, h),
                Point::new(-1, h / 2),
                Point::new(w, h / 2),
            ],
            cursor: Point::new(w / 2, h / 2),
            neighbours: [None; 4],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the tile.
    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn position(&self) -> GridPosition {
        self.position
    }

    #[inline]
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// The door point on the side the given direction faces.
    #[inline]
    pub fn exit(&self, direction: Direction) -> Point {
        self.exits[direction.index()]
    }

    #[inline]
    pub fn neighbour(&self, direction: Direction) -> Option<GridPosition> {
        self.neighbours[direction.index()]
    }

    pub fn set_neighbour(&mut self, direction: Direction, position: GridPosition) {
        self.neighbours[direction.index()] = Some(position);
    }

    /// Is the point one of this tile's cells?
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        0 <= point.x && point.x < self.width as isize && 0 <= point.y
            && point.y < self.height as isize
    }

    /// Is the point one of the four door thresholds on this tile's edge?
    pub fn is_exit(&self, point: Point) -> bool {
        self.exits.iter().any(|&exit| exit == point)
    }

    /// The passage mask of a cell. Panics on a point outside the tile.
    #[inline]
    pub fn passages(&self, point: Point) -> Passages {
        self.cells[self.cell_index(point).expect("passages queried outside the tile")]
    }

    /// Is there a carved passage out of `point` in the given direction?
    #[inline]
    pub fn has_passage(&self, point: Point, direction: Direction) -> bool {
        self.passages(point).contains(direction)
    }

    /// Carve a passage from `point` to its neighbour in the given direction,
    /// recording it on both cells in one step so a passage can never exist on
    /// one side only. Panics if either end is outside the tile.
    pub fn carve(&mut self, point: Point, direction: Direction) {
        let here = self.cell_index(point).expect("carve from outside the tile");
        let there = self.cell_index(point.advance(direction))
            .expect("carve toward a cell outside the tile");
        self.cells[here].insert(direction);
        self.cells[there].insert(direction.opposite());
    }

    /// Directions whose in-bounds neighbouring cell has nothing carved yet.
    pub fn unvisited_directions(&self, point: Point) -> DirectionSmallVec {
        DIRECTIONS
            .iter()
            .cloned()
            .filter(|&direction| {
                let next = point.advance(direction);
                self.contains(next) && self.passages(next).is_empty()
            })
            .collect()
    }

    /// Move the cursor one cell, if there is a carved passage that way.
    /// A move into a wall or out of bounds is a silent no-op: illegal moves
    /// arrive constantly from a live explorer and are not errors.
    pub fn move_cursor(&mut self, direction: Direction) {
        let next = self.cursor.advance(direction);
        if self.contains(next) && self.has_passage(self.cursor, direction) {
            self.cursor = next;
        }
    }

    /// Drop the cursor onto a specific cell; used when entering through a door.
    pub(crate) fn place_cursor(&mut self, point: Point) {
        debug_assert!(self.contains(point));
        self.cursor = point;
    }

    /// All cell points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let width = self.width;
        (0..self.height)
            .cartesian_product(0..width)
            .map(|(y, x)| Point::new(x as isize, y as isize))
    }

    /// Carved passages counted once per undirected pair of cells.
    pub fn passages_count(&self) -> usize {
        let directed: usize = self.points().map(|point| self.passages(point).count()).sum();
        directed / 2
    }

    #[inline]
    fn cell_index(&self, point: Point) -> Option<usize> {
        if self.contains(point) {
            Some(point.y as usize * self.width + point.x as usize)
        } else {
            None
        }
    }
}
