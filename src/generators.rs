use rand::{Rng, SeedableRng, XorShiftRng};

use crate::tile::Tile;

/// Build the random stream that drives tile carving from a plain `u64` seed.
/// The xorshift state must not be all zero, so the seed words are mixed with
/// fixed constants and one word is forced odd.
pub fn rng_from_seed(seed: u64) -> XorShiftRng {
    let low = seed as u32;
    let high = (seed >> 32) as u32;
    XorShiftRng::from_seed([
        low ^ 0x9e37_79b9,
        high ^ 0x85eb_ca6b,
        (low.rotate_left(16) ^ high) | 1,
        high ^ 0xc2b2_ae35,
    ])
}

/// Carve a perfect maze into a freshly allocated tile whose cell grid has no
/// passages yet, starting from the cell under the tile's cursor.
///
/// Works a frontier of visited cells: pull a random cell out of the *older
/// half* of the frontier, then random-walk from it through cells that have
/// nothing carved yet, carving as it goes and pushing every newly reached
/// cell, until the walk is boxed in. The half-frontier pick revisits early
/// corridors often, which keeps branches short near the start and leaves the
/// long twisty runs for the frontier's tail. The frontier drains exactly when
/// every cell has been carved into: the result is a spanning tree of the
/// cells, every cell reachable with no cycles.
///
/// Both dimensions must be at least 1. Given a fixed rng stream the carving
/// is fully deterministic.
pub fn carve_tile(tile: &mut Tile, rng: &mut XorShiftRng) {
    let mut frontier = vec![tile.cursor()];

    while !frontier.is_empty() {
        let pick = rng.gen::<usize>() % ((frontier.len() + 1) / 2);
        let mut point = frontier.remove(pick);

        loop {
            let open = tile.unvisited_directions(point);
            if open.is_empty() {
                break;
            }
            let direction = open[rng.gen::<usize>() % open.len()];
            tile.carve(point, direction);
            point = point.advance(direction);
            frontier.push(point);
        }
    }
}
