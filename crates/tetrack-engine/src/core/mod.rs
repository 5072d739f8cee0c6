pub use self::{bit_board::*, color::*, piece::*, role_board::*};

pub(crate) mod bit_board;
pub(crate) mod color;
pub(crate) mod piece;
pub(crate) mod role_board;

/// Number of columns on the NES playfield.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the NES playfield.
pub const BOARD_HEIGHT: usize = 20;
