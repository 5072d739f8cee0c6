//! Behaviors of the estimator states.

pub use self::{before_game::*, game_end::*, limbo::*, running::*};

mod before_game;
mod game_end;
mod limbo;
mod running;
