//! Error types shared across the crate, generated with `error_chain!`.
//!
//! Only configuration problems and unknown registry lookups are errors here.
//! A rejected cursor move is an expected no-op, and a broken linking invariant
//! is a programming fault that panics rather than corrupting fabric state.

use error_chain::*;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        InvalidTileDimensions(width: usize, height: usize) {
            description("invalid tile dimensions")
            display("invalid tile dimensions {}x{}: each side needs at least 3 cells so the doors have room", width, height)
        }
        UnknownTilePosition(key: String) {
            description("unknown tile position")
            display("no tile registered at {}", key)
        }
    }
}
