//! The fabric: every generated tile, keyed by grid position, plus the cursor's
//! current tile and the shared random stream that carves new tiles.
//!
//! All mutation funnels through `&mut Fabric`, so one fabric can never race
//! against itself; the check-registry/create/link sequence in
//! `ensure_neighbours` runs to completion before any other call can observe
//! the registry. Multiple viewers over one world share a `Mutex<Fabric>` and
//! keep their own `GridPosition` per viewer.

use error_chain::{bail, ensure};
use rand::XorShiftRng;

use crate::directions::{Direction, DIRECTIONS};
use crate::errors::*;
use crate::generators::{carve_tile, rng_from_seed};
use crate::pathing;
use crate::tile::{GridPosition, Tile};
use crate::units::{Height, Width};
use crate::utils::{fnv_hashmap, FnvHashMap};

/// Grid position of the seed tile every fabric starts from.
pub const ORIGIN: GridPosition = GridPosition { x: 0, y: 0 };

/// The doors sit on side midpoints; anything smaller than 3x3 has no cell ring
/// between a door and the tile's corners.
const MIN_TILE_SIDE: usize = 3;

#[derive(Debug)]
pub struct Fabric {
    tiles: FnvHashMap<GridPosition, Tile>,
    current: GridPosition,
    tile_height: Height,
    tile_width: Width,
    rng: XorShiftRng,
}

impl Fabric {
    /// A fabric with one carved seed tile at the origin and its four
    /// neighbours already materialized, so the first door crossing always has
    /// somewhere to land. All tiles share the given dimensions for the
    /// fabric's lifetime; the seed fixes the whole generation stream.
    pub fn new(height: Height, width: Width, seed: u64) -> Result<Fabric> {
        if height.0 < MIN_TILE_SIDE || width.0 < MIN_TILE_SIDE {
            bail!(ErrorKind::InvalidTileDimensions(width.0, height.0));
        }

        let mut fabric = Fabric {
            tiles: fnv_hashmap(32),
            current: ORIGIN,
            tile_height: height,
            tile_width: width,
            rng: rng_from_seed(seed),
        };
        let mut seed_tile = Tile::new(height, width, ORIGIN);
        carve_tile(&mut seed_tile, &mut fabric.rng);
        debug_assert!(pathing::is_perfect_maze(&seed_tile));
        fabric.tiles.insert(ORIGIN, seed_tile);
        fabric.ensure_neighbours(ORIGIN);

        Ok(fabric)
    }

    #[inline]
    pub fn tile_height(&self) -> Height {
        self.tile_height
    }

    #[inline]
    pub fn tile_width(&self) -> Width {
        self.tile_width
    }

    /// The tile the cursor is currently inside.
    pub fn current_tile(&self) -> &Tile {
        self.tiles
            .get(&self.current)
            .expect("the current tile is always registered")
    }

    #[inline]
    pub fn current_position(&self) -> GridPosition {
        self.current
    }

    pub fn tile(&self, position: GridPosition) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    /// How many tiles have been generated so far.
    pub fn tiles_count(&self) -> usize {
        self.tiles.len()
    }

    /// Grid positions of every generated tile, in no particular order.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.tiles.keys().cloned()
    }

    /// The only mutation entry point: move the cursor one cell.
    ///
    /// Stepping onto a door threshold switches the current tile to the
    /// neighbour on that side, drops the cursor one step inside the new tile
    /// on the side facing back toward the tile just left, and materializes
    /// the new tile's own neighbours. Any other move is handled by the tile
    /// itself; walls and bounds reject it silently.
    pub fn move_cursor(&mut self, direction: Direction) {
        let next = self.current_tile().cursor().advance(direction);

        if self.current_tile().is_exit(next) {
            let destination = self.current_tile()
                .neighbour(direction)
                .expect("crossed a door into a tile that was never linked");
            self.current = destination;
            {
                let tile = self.tiles
                    .get_mut(&destination)
                    .expect("a linked neighbour is always registered");
                let entry = tile.exit(direction.opposite()).advance(direction);
                tile.place_cursor(entry);
            }
            self.ensure_neighbours(destination);
        } else {
            let position = self.current;
            self.tiles
                .get_mut(&position)
                .expect("the current tile is always registered")
                .move_cursor(direction);
        }
    }

    /// Guarantee that all four neighbours of the tile at `position` exist and
    /// are linked in both directions, generating the missing ones. Idempotent:
    /// once all four links are set this does nothing.
    ///
    /// A brand new neighbour gets its link back to `position` before it is
    /// carved and registered, so a tile can never be reachable through the
    /// registry while half-linked. Axes are visited in a fixed order to keep
    /// the generation stream reproducible for a given seed.
    pub fn ensure_neighbours(&mut self, position: GridPosition) {
        for &direction in DIRECTIONS.iter() {
            let already_linked = self.tiles
                .get(&position)
                .expect("ensure_neighbours on an unregistered tile")
                .neighbour(direction)
                .is_some();
            if already_linked {
                continue;
            }

            let neighbour_position = position.shifted(direction);
            if let Some(neighbour) = self.tiles.get_mut(&neighbour_position) {
                neighbour.set_neighbour(direction.opposite(), position);
            } else {
                let mut neighbour =
                    Tile::new(self.tile_height, self.tile_width, neighbour_position);
                // Back-link first: a tile is never registered half-linked.
                neighbour.set_neighbour(direction.opposite(), position);
                carve_tile(&mut neighbour, &mut self.rng);
                debug_assert!(pathing::is_perfect_maze(&neighbour));
                self.tiles.insert(neighbour_position, neighbour);
            }
            self.tiles
                .get_mut(&position)
                .expect("ensure_neighbours on an unregistered tile")
                .set_neighbour(direction, neighbour_position);
        }
    }

    /// Point the fabric at an already generated tile, e.g. when an outside
    /// session layer restores a viewer by its `"x,y"` key. The target tile's
    /// neighbours are materialized just as after a door crossing.
    pub fn switch_current_tile(&mut self, position: GridPosition) -> Result<()> {
        ensure!(
            self.tiles.contains_key(&position),
            ErrorKind::UnknownTilePosition(position.to_string())
        );
        self.current = position;
        self.ensure_neighbours(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::directions::Direction::*;
    use crate::tile::Point;

    fn fabric() -> Fabric {
        Fabric::new(Height(5), Width(5), 99).expect("valid dimensions")
    }

    /// Walk the cursor to the cell just inside the given door and step
    /// through it, forcing exactly one crossing.
    fn cross(fabric: &mut Fabric, direction: Direction) {
        let threshold = {
            let tile = fabric.current_tile();
            tile.exit(direction).advance(direction.opposite())
        };
        let position = fabric.current_position();
        walk_cursor_to(fabric, position, threshold);
        fabric.move_cursor(direction);
    }

    // Stage a door approach directly; place_cursor is crate-internal so tests
    // need not solve the maze to reach a threshold.
    fn walk_cursor_to(fabric: &mut Fabric, position: GridPosition, point: Point) {
        fabric.tiles.get_mut(&position).unwrap().place_cursor(point);
    }

    #[test]
    fn construction_rejects_undersized_tiles() {
        assert!(Fabric::new(Height(0), Width(5), 1).is_err());
        assert!(Fabric::new(Height(5), Width(0), 1).is_err());
        assert!(Fabric::new(Height(2), Width(9), 1).is_err());
        let err = Fabric::new(Height(1), Width(1), 1).unwrap_err();
        assert!(err.to_string().contains("invalid tile dimensions"));
    }

    #[test]
    fn a_new_fabric_has_the_seed_tile_and_its_ring() {
        let fabric = fabric();
        assert_eq!(fabric.tiles_count(), 5);
        assert_eq!(fabric.current_position(), ORIGIN);
        assert_eq!(fabric.current_tile().cursor(), Point::new(2, 2));
        for &direction in DIRECTIONS.iter() {
            let linked = fabric.current_tile().neighbour(direction);
            assert_eq!(linked, Some(ORIGIN.shifted(direction)));
            assert!(fabric.tile(linked.unwrap()).is_some());
        }
    }

    #[test]
    fn ensure_neighbours_is_idempotent() {
        let mut fabric = fabric();
        let before = fabric.tiles_count();
        fabric.ensure_neighbours(ORIGIN);
        fabric.ensure_neighbours(ORIGIN);
        assert_eq!(fabric.tiles_count(), before);
    }

    #[test]
    fn crossing_the_top_door_switches_to_the_north_tile() {
        let mut fabric = fabric();
        cross(&mut fabric, Up);

        let north = GridPosition::new(0, 1);
        assert_eq!(fabric.current_position(), north);
        // The new tile points back at the origin across the shared edge.
        assert_eq!(fabric.current_tile().neighbour(Down), Some(ORIGIN));
        // The cursor lands one step inside, just above the south-side door.
        assert_eq!(fabric.current_tile().cursor(), Point::new(2, 4));
        // The new current tile has a full ring of its own.
        for &direction in DIRECTIONS.iter() {
            assert!(fabric.current_tile().neighbour(direction).is_some());
        }
    }

    #[test]
    fn each_crossing_direction_lands_facing_back() {
        let cases = [
            (Up, GridPosition::new(0, 1), Point::new(2, 4)),
            (Down, GridPosition::new(0, -1), Point::new(2, 0)),
            (Left, GridPosition::new(-1, 0), Point::new(4, 2)),
            (Right, GridPosition::new(1, 0), Point::new(0, 2)),
        ];
        for &(direction, destination, entry) in cases.iter() {
            let mut fabric = fabric();
            cross(&mut fabric, direction);
            assert_eq!(fabric.current_position(), destination);
            assert_eq!(fabric.current_tile().cursor(), entry);
            assert_eq!(
                fabric.current_tile().neighbour(direction.opposite()),
                Some(ORIGIN)
            );
        }
    }

    #[test]
    fn wandering_grows_the_registry_one_ring_ahead() {
        let mut fabric = fabric();
        for &direction in [Up, Up, Right, Down, Left, Left].iter() {
            cross(&mut fabric, direction);
            for &side in DIRECTIONS.iter() {
                assert!(fabric.current_tile().neighbour(side).is_some());
            }
        }
        // Back on the column west of the origin after the round trip.
        assert_eq!(fabric.current_position(), GridPosition::new(-1, 1));
    }

    #[test]
    fn every_tile_knows_its_own_registry_key() {
        let mut fabric = fabric();
        for &direction in [Up, Left, Down, Down, Right, Right].iter() {
            cross(&mut fabric, direction);
        }
        for position in fabric.positions().collect_vec() {
            assert_eq!(fabric.tile(position).unwrap().position(), position);
        }
    }

    #[test]
    fn links_are_symmetric_across_the_whole_registry() {
        let mut fabric = fabric();
        for &direction in [Up, Right, Right, Down, Left, Up].iter() {
            cross(&mut fabric, direction);
        }
        for position in fabric.positions().collect_vec() {
            let tile = fabric.tile(position).unwrap();
            for &direction in DIRECTIONS.iter() {
                if let Some(linked) = tile.neighbour(direction) {
                    let back = fabric
                        .tile(linked)
                        .expect("a linked neighbour is always registered")
                        .neighbour(direction.opposite());
                    assert_eq!(back, Some(position));
                }
            }
        }
    }

    #[test]
    fn crossing_back_returns_to_the_same_tile_instance() {
        let mut fabric = fabric();
        cross(&mut fabric, Up);
        let north_count = fabric.tiles_count();
        cross(&mut fabric, Down);

        assert_eq!(fabric.current_position(), ORIGIN);
        // Nothing new needed: the origin's ring already existed.
        assert_eq!(fabric.tiles_count(), north_count);
    }

    #[test]
    fn blocked_moves_change_nothing() {
        let mut fabric = fabric();

        // Every (interior cell, walled direction) pair must reject the move.
        // A 5x5 spanning tree leaves plenty of interior walls.
        let cases: Vec<(Point, Direction)> = {
            let tile = fabric.current_tile();
            tile.points()
                .filter(|p| 0 < p.x && p.x < 4 && 0 < p.y && p.y < 4)
                .flat_map(|p| {
                    DIRECTIONS
                        .iter()
                        .cloned()
                        .filter(move |&d| !tile.has_passage(p, d))
                        .map(move |d| (p, d))
                })
                .collect()
        };
        assert!(!cases.is_empty());

        let masks_before: Vec<_> = {
            let tile = fabric.current_tile();
            tile.points().map(|p| tile.passages(p)).collect()
        };
        for &(point, direction) in cases.iter() {
            walk_cursor_to(&mut fabric, ORIGIN, point);
            fabric.move_cursor(direction);
            assert_eq!(fabric.current_tile().cursor(), point);
            assert_eq!(fabric.current_position(), ORIGIN);
        }
        let tile = fabric.current_tile();
        let masks_after: Vec<_> = tile.points().map(|p| tile.passages(p)).collect();
        assert_eq!(masks_before, masks_after);
    }

    #[test]
    fn same_seed_reproduces_the_same_world() {
        let mut a = Fabric::new(Height(7), Width(9), 2024).unwrap();
        let mut b = Fabric::new(Height(7), Width(9), 2024).unwrap();
        for &direction in [Up, Right, Down].iter() {
            cross(&mut a, direction);
            cross(&mut b, direction);
        }

        let positions = a.positions().sorted();
        assert_eq!(positions, b.positions().sorted());
        for &position in positions.iter() {
            let (ta, tb) = (a.tile(position).unwrap(), b.tile(position).unwrap());
            assert!(ta.points().all(|p| ta.passages(p) == tb.passages(p)));
        }
    }

    #[test]
    fn switching_tiles_by_key_requires_a_known_position() {
        let mut fabric = fabric();
        let north = GridPosition::new(0, 1);
        fabric.switch_current_tile(north).unwrap();
        assert_eq!(fabric.current_position(), north);
        // The switched-to tile gets its ring, same as a crossing.
        for &direction in DIRECTIONS.iter() {
            assert!(fabric.current_tile().neighbour(direction).is_some());
        }

        let missing = GridPosition::new(40, -3);
        let err = fabric.switch_current_tile(missing).unwrap_err();
        assert!(err.to_string().contains("40,-3"));
        assert_eq!(fabric.current_position(), north);
    }
}
