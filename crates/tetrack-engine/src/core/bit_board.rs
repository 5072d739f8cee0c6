use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH};

// Full row (all playfield cells occupied)
const FULL_ROW_MASK: u16 = (1 << BOARD_WIDTH) - 1;

/// Single row in the bit board representation.
///
/// Stores one row of the playfield as a 16-bit bitmask where bit N is column N.
/// Bits 10-15 are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct BitRow {
    bits: u16,
}

impl BitRow {
    pub const EMPTY: Self = Self { bits: 0 };
    pub const FULL: Self = Self {
        bits: FULL_ROW_MASK,
    };

    /// Checks if every cell in the row is occupied.
    #[inline]
    #[must_use]
    pub fn is_filled(self) -> bool {
        self.bits == FULL_ROW_MASK
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// Checks if the cell at column `x` is occupied.
    #[inline]
    #[must_use]
    pub fn is_cell_occupied(self, x: usize) -> bool {
        x < BOARD_WIDTH && (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn occupy_cell(&mut self, x: usize) {
        debug_assert!(x < BOARD_WIDTH);
        self.bits |= 1 << x;
    }

    /// Number of occupied cells in the row.
    #[inline]
    #[must_use]
    pub fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Iterates over all cells in the row, returning their occupied status.
    #[inline]
    pub fn iter_cells(self) -> impl Iterator<Item = bool> {
        (0..BOARD_WIDTH).map(move |x| (self.bits & (1 << x)) != 0)
    }
}

/// Binary occupancy bitmap of the 10×20 playfield.
///
/// This is the "is there a mino here" view of a captured frame, with no color
/// information. Two boards compare equal exactly when they are pixel-identical at
/// cell resolution, which is what the stuck-board detection relies on.
///
/// Row 0 is the top of the playfield; column 0 is the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitBoard {
    rows: [BitRow; BOARD_HEIGHT],
}

impl Default for BitBoard {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Serialize for BitBoard {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: one 10-character string per row, top row first, e.g. "##...#...."
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                row.iter_cells()
                    .map(|occupied| if occupied { '#' } else { '.' })
                    .collect()
            })
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BitBoard {
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

        let mut board = BitBoard::EMPTY;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != BOARD_WIDTH {
                return Err(serde::de::Error::custom(format!(
                    "row {y} must have {BOARD_WIDTH} cells, got '{row}'"
                )));
            }
            for (x, c) in row.chars().enumerate() {
                match c {
                    '#' => board.occupy(x, y),
                    '.' => {}
                    _ => {
                        return Err(serde::de::Error::custom(format!(
                            "invalid cell '{c}' at ({x}, {y})"
                        )));
                    }
                }
            }
        }
        Ok(board)
    }
}

impl BitBoard {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [BitRow::EMPTY; BOARD_HEIGHT],
    };

    #[must_use]
    pub fn row(&self, y: usize) -> BitRow {
        self.rows[y]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = BitRow> + '_ {
        self.rows.iter().copied()
    }

    /// Checks if the cell at `(x, y)` is occupied. Out-of-range cells are empty.
    #[must_use]
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        y < BOARD_HEIGHT && self.rows[y].is_cell_occupied(x)
    }

    pub fn occupy(&mut self, x: usize, y: usize) {
        self.rows[y].occupy_cell(x);
    }

    /// Total number of occupied cells.
    #[must_use]
    pub fn count_occupied(&self) -> u32 {
        self.rows.iter().map(|row| row.count()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.is_empty())
    }

    /// Iterates over the coordinates of all occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter_cells()
                .enumerate()
                .filter_map(move |(x, occupied)| occupied.then_some((x, y)))
        })
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut rows = self.rows;
        for (row, other) in rows.iter_mut().zip(&other.rows) {
            row.bits |= other.bits;
        }
        Self { rows }
    }

    /// Cells occupied in `self` but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let mut rows = self.rows;
        for (row, other) in rows.iter_mut().zip(&other.rows) {
            row.bits &= !other.bits;
        }
        Self { rows }
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.rows
            .iter()
            .zip(&other.rows)
            .any(|(a, b)| a.bits & b.bits != 0)
    }

    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.difference(other).is_empty()
    }

    /// Filled rows as a mask, bit `y` set for row `y`.
    #[must_use]
    pub fn filled_rows(&self) -> u32 {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_filled())
            .fold(0, |mask, (y, _)| mask | (1 << y))
    }

    /// Removes the rows set in `rows` (see [`BitBoard::filled_rows`]).
    ///
    /// Rows above a removed row fall down; empty rows are inserted at the top.
    /// Returns the number of rows removed.
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

        self.rows[..count].fill(BitRow::EMPTY);
        count
    }

    /// Clears filled lines and returns the number of lines cleared.
    pub fn clear_lines(&mut self) -> usize {
        self.remove_rows(self.filled_rows())
    }

    /// Creates a `BitBoard` from ASCII art.
    ///
    /// '#' represents an occupied cell, '.' an empty one. Rows are given top to
    /// bottom; fewer than 20 rows are aligned to the bottom of the playfield.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= BOARD_HEIGHT,
            "at most {BOARD_HEIGHT} rows, got {}",
            lines.len()
        );
        let offset = BOARD_HEIGHT - lines.len();

        for (y, line) in lines.iter().enumerate() {
            let chars: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                chars.len(),
                BOARD_WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                BOARD_WIDTH,
                chars.len(),
                y
            );

            for (x, &ch) in chars.iter().enumerate() {
                if ch == '#' {
                    board.rows[y + offset].occupy_cell(x);
                }
            }
        }
        board
    }
}
