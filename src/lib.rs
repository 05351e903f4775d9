//! **mazefabric** is an endless explorable maze world: fixed-size perfect-maze
//! tiles on an infinite grid, carved on demand and joined through doors on
//! their shared edges, so the explorer is always one crossing away from maze
//! that already exists.

pub mod directions;
pub mod errors;
pub mod fabric;
pub mod generators;
pub mod pathing;
pub mod renderers;
pub mod tile;
pub mod units;
mod utils;
