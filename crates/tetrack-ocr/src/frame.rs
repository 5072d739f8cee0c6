use std::time::Duration;

use tetrack_engine::{BitBoard, PieceKind, Rgb, RoleBoard};

use crate::{color::ColorClassifier, error::ColorError};

/// One captured frame of the game feed, as seen through an external recognizer.
///
/// Every reading may be wrong. Readers return `None` when the recognizer could
/// not produce a value at all.
pub trait OcrFrame {
    /// Frame time, measured from an arbitrary origin of the feed.
    fn timestamp(&self) -> Duration;

    /// Occupancy of every playfield cell.
    fn binary_board(&self) -> BitBoard;

    /// Average color sampled inside the cell at `(x, y)`.
    fn raw_mino_color(&self, x: usize, y: usize) -> Rgb;

    /// Piece shown in the next box, `None` if it could not be recognized.
    fn next_piece(&self) -> Option<PieceKind>;

    /// How little the playfield region looks like a board. `0.0` is a clean board.
    fn board_noise(&self) -> f32;

    /// Reads the lines counter.
    ///
    /// With `reduced` set, only the last two digits are read.
    fn read_lines(&self, reduced: bool) -> Option<u32>;

    /// Reads the score counter.
    ///
    /// With `reduced` set, only the last five digits are read.
    fn read_score(&self, reduced: bool) -> Option<u32>;

    /// Classifies the color of every occupied cell with the palette of `level`.
    ///
    /// # Errors
    ///
    /// Propagates structural errors of the color table.
    fn color_board(&self, level: u32, colors: &ColorClassifier) -> Result<RoleBoard, ColorError> {
        let mut board = RoleBoard::EMPTY;
        for (x, y) in self.binary_board().occupied_cells() {
            board.set(x, y, colors.classify(level, self.raw_mino_color(x, y))?);
        }
        Ok(board)
    }
}
