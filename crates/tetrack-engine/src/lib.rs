//! Playfield, piece and game status types shared by the tetrack crates.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
