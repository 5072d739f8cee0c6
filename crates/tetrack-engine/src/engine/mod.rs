//! Game status and per-session context.
//!
//! - [`GameStatus`] - Level, lines and score advanced with NES rules
//! - [`GameSession`] - Status of the current game, rollover profile and the
//!   latest published [`GameSnapshot`]

pub use self::{game_session::*, game_status::*};

mod game_session;
mod game_status;
