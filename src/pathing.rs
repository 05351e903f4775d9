use bit_set::BitSet;

use crate::directions::DIRECTIONS;
use crate::tile::{Point, Tile};

/// Flood out from `start` along carved passages and report every cell reached,
/// as row-major cell indices. An out-of-tile start reaches nothing.
///
/// The visited set doubles as the frontier bookkeeping: a cell goes onto the
/// frontier exactly once, when it is first marked.
pub fn reachable_cells(tile: &Tile, start: Point) -> BitSet {
    let mut visited = BitSet::with_capacity(tile.size());
    if !tile.contains(start) {
        return visited;
    }

    visited.insert(cell_index(tile, start));
    let mut frontier = vec![start];
    while let Some(point) = frontier.pop() {
        for &direction in DIRECTIONS.iter() {
            if tile.has_passage(point, direction) {
                let next = point.advance(direction);
                if visited.insert(cell_index(tile, next)) {
                    frontier.push(next);
                }
            }
        }
    }

    visited
}

/// Can every cell of the tile be reached from the cursor's cell?
pub fn is_fully_connected(tile: &Tile) -> bool {
    reachable_cells(tile, tile.cursor()).len() == tile.size()
}

/// Do the tile's passages form a spanning tree over its cells?
/// Connected with exactly `cells - 1` undirected passages means no cycles.
pub fn is_perfect_maze(tile: &Tile) -> bool {
    is_fully_connected(tile) && tile.passages_count() == tile.size() - 1
}

fn cell_index(tile: &Tile, point: Point) -> usize {
    point.y as usize * tile.width() + point.x as usize
}
