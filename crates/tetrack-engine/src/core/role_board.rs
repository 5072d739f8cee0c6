use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH, bit_board::BitBoard, color::ColorRole, piece::Piece};

const EMPTY_ROW: [ColorRole; BOARD_WIDTH] = [ColorRole::Empty; BOARD_WIDTH];

/// Cell-by-cell view of the playfield, tagging every mino with its [`ColorRole`].
///
/// This is the board the estimator publishes in each snapshot, and also the form
/// in which a *trusted* board (roles known from piece identity rather than from
/// color classification) is handed to color derivation.
///
/// Uses the same coordinates as [`BitBoard`]: row 0 is the top of the playfield.
///
/// # Example
///
/// ```
/// use tetrack_engine::{ColorRole, RoleBoard};
///
/// let mut board = RoleBoard::EMPTY;
/// board.set(0, 19, ColorRole::White);
/// assert_eq!(board.minos().count(), 1);
/// assert!(board.to_bit_board().is_occupied(0, 19));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBoard {
    rows: [[ColorRole; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Default for RoleBoard {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RoleBoard {
    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> ColorRole {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, role: ColorRole) {
        self.rows[y][x] = role;
    }

    /// Iterates over every non-empty cell as `(x, y, role)`.
    pub fn minos(&self) -> impl Iterator<Item = (usize, usize, ColorRole)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, role)| !role.is_empty())
                .map(move |(x, role)| (x, y, *role))
        })
    }

    /// Fills the piece's cells with the role its kind is drawn with.
    ///
    /// Cells of a piece that does not fit on the playfield are ignored.
    pub fn fill_piece(&mut self, piece: Piece) {
        let role = piece.kind().color_role();
        for (x, y) in piece.cells().into_iter().flatten() {
            self.rows[y][x] = role;
        }
    }

    /// The occupancy bitmap of this board.
    #[must_use]
    pub fn to_bit_board(&self) -> BitBoard {
        let mut board = BitBoard::EMPTY;
        for (x, y, _) in self.minos() {
            board.occupy(x, y);
        }
        board
    }

    /// Removes the rows set in `rows`, as [`BitBoard::remove_rows`] does.
    pub fn remove_rows(&mut self, rows: u32) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if rows & (1 << y) != 0 {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }
}

impl fmt::Display for RoleBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows.iter().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for role in row {
                write!(f, "{}", role.as_char())?;
            }
        }
        Ok(())
    }
}

impl Serialize for RoleBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one 10-character string per row, e.g. "....WW.PPS"
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|role| role.as_char()).collect())
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoleBoard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        if rows.len() != BOARD_HEIGHT {
            return Err(serde::de::Error::custom(format!(
                "expected {BOARD_HEIGHT} rows, got {}",
                rows.len()
            )));
        }

        let mut board = RoleBoard::EMPTY;
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.chars().collect();
            if cells.len() != BOARD_WIDTH {
                return Err(serde::de::Error::custom(format!(
                    "row {y} must have {BOARD_WIDTH} cells, got '{row}'"
                )));
            }
            for (x, c) in cells.into_iter().enumerate() {
                let role = ColorRole::from_char(c).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid role '{c}' at ({x}, {y})"))
                })?;
                board.rows[y][x] = role;
            }
        }
        Ok(board)
    }
}
