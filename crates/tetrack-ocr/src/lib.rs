//! Game state estimation for NES Tetris video feeds.
//!
//! The recognizer that turns a captured frame into a board bitmap, cell colors
//! and digit reads lives outside of this crate, behind the [`OcrFrame`] trait.
//! Its output is noisy: digits get misread, the board is sometimes hidden, and
//! the palette of the capture differs from the NES one. [`OcrStateMachine`]
//! consumes those frames one at a time and publishes a plausible, monotonic
//! [`GameSnapshot`](tetrack_engine::GameSnapshot) into the session on each of
//! them.
//!
//! # States
//!
//! - [`BeforeGame`](states::BeforeGame) waits for a fresh game.
//! - [`Running`](states::Running) verifies every placement with a
//!   [`StackTracker`] and learns the mino colors from verified cells.
//! - [`Limbo`](states::Limbo) keeps reconciling the counters while placements
//!   cannot be verified.
//! - [`GameEnd`](states::GameEnd) closes the game.
//!
//! Transitions are driven by [`events`], each debounced by a
//! [`PersistenceStrategy`].

pub use self::{
    color::*, config::*, counters::*, error::*, frame::*, machine::*, persistence::*, state::*,
    tracker::*,
};

mod color;
mod config;
mod counters;
mod error;
pub mod events;
mod frame;
mod machine;
mod persistence;
pub mod recording;
mod state;
pub mod states;
mod tracker;
