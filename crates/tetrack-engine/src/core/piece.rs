use serde::{Deserialize, Serialize};

use super::{BOARD_HEIGHT, BOARD_WIDTH, bit_board::BitBoard, color::ColorRole};

/// A tetromino placed on the playfield, with position, rotation, and type.
///
/// The position is the top-left corner of the piece's 4×4 bounding box and may be
/// negative or extend past the playfield; [`Piece::cells`] tells whether the
/// piece actually fits.
///
/// # Example
///
/// ```
/// use tetrack_engine::{Piece, PieceKind, PieceRotation};
///
/// let piece = Piece::new(PieceKind::O, PieceRotation::default(), 0, 18);
/// assert_eq!(piece.cells(), Some([(0, 18), (1, 18), (0, 19), (1, 19)]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    x: i8,
    y: i8,
}

impl Piece {
    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    /// Playfield cells covered by the piece, or `None` if any cell is off the field.
    #[must_use]
    pub fn cells(&self) -> Option<[(usize, usize); 4]> {
        let mut cells = [(0, 0); 4];
        for (cell, (dx, dy)) in cells
            .iter_mut()
            .zip(self.kind.occupied_offsets(self.rotation))
        {
            let x = usize::try_from(i16::from(self.x) + i16::from(dx)).ok()?;
            let y = usize::try_from(i16::from(self.y) + i16::from(dy)).ok()?;
            if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
                return None;
            }
            *cell = (x, y);
        }
        Some(cells)
    }

    /// The piece as a board bitmap, or `None` if it does not fit on the playfield.
    #[must_use]
    pub fn to_bit_board(&self) -> Option<BitBoard> {
        let mut board = BitBoard::EMPTY;
        for (x, y) in self.cells()? {
            board.occupy(x, y);
        }
        Some(board)
    }

    /// Enumerates every in-bounds placement of `kind` on the playfield.
    pub fn all_placements(kind: PieceKind) -> impl Iterator<Item = Piece> {
        const MIN: i8 = -3;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const MAX_X: i8 = BOARD_WIDTH as i8;
        #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        const MAX_Y: i8 = BOARD_HEIGHT as i8;

        PieceRotation::ALL.into_iter().flat_map(move |rotation| {
            (MIN..MAX_Y).flat_map(move |y| {
                (MIN..MAX_X)
                    .map(move |x| Piece::new(kind, rotation, x, y))
                    .filter(|piece| piece.cells().is_some())
            })
        })
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation of the bounding-box shape
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const ALL: [PieceRotation; 4] = [
        PieceRotation(0),
        PieceRotation(1),
        PieceRotation(2),
        PieceRotation(3),
    ];

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// The palette entry NES Tetris draws this piece's minos with.
    ///
    /// ```
    /// use tetrack_engine::{ColorRole, PieceKind};
    ///
    /// assert_eq!(PieceKind::T.color_role(), ColorRole::White);
    /// assert_eq!(PieceKind::J.color_role(), ColorRole::Primary);
    /// assert_eq!(PieceKind::Z.color_role(), ColorRole::Secondary);
    /// ```
    #[must_use]
    pub const fn color_role(self) -> ColorRole {
        match self {
            PieceKind::I | PieceKind::O | PieceKind::T => ColorRole::White,
            PieceKind::J | PieceKind::S => ColorRole::Primary,
            PieceKind::Z | PieceKind::L => ColorRole::Secondary,
        }
    }

    /// Cells the piece occupies at the moment it spawns at the top of the playfield.
    #[must_use]
    pub const fn spawn_cells(self) -> [(usize, usize); 4] {
        SPAWN_CELLS[self as usize]
    }

    /// The spawned piece as a board bitmap.
    #[must_use]
    pub fn spawn_board(self) -> BitBoard {
        let mut board = BitBoard::EMPTY;
        for (x, y) in self.spawn_cells() {
            board.occupy(x, y);
        }
        board
    }

    /// Returns an iterator of occupied offsets within the 4×4 bounding box.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i8, i8)> {
        let shape = &PIECE_SHAPES[self as usize][rotation.as_usize()];
        (0..4i8).flat_map(move |dy| {
            (0..4i8).filter_map(move |dx| {
                shape[dy.unsigned_abs() as usize][dx.unsigned_abs() as usize]
                    .then_some((dx, dy))
            })
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrack_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single character.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrack_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('I'), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

// NES spawn footprints: the rotation pivot sits at column 5 of the top row.
const SPAWN_CELLS: [[(usize, usize); 4]; PieceKind::LEN] = [
    // I-piece
    [(3, 0), (4, 0), (5, 0), (6, 0)],
    // O-piece
    [(4, 0), (5, 0), (4, 1), (5, 1)],
    // S-piece
    [(5, 0), (6, 0), (4, 1), (5, 1)],
    // Z-piece
    [(4, 0), (5, 0), (5, 1), (6, 1)],
    // J-piece
    [(4, 0), (5, 0), (6, 0), (6, 1)],
    // L-piece
    [(4, 0), (5, 0), (6, 0), (4, 1)],
    // T-piece
    [(4, 0), (5, 0), (6, 0), (5, 1)],
];

/// Piece shape represented as a 4×4 occupancy grid.
type PieceShape = [[bool; 4]; 4];

/// Generates all 4 rotation states of a piece shape by rotating 90° clockwise.
///
/// # Arguments
///
/// * `size` - Effective size of the piece (3 for most pieces, 4 for I, 2 for O)
/// * `shape` - Initial piece shape at 0° rotation
const fn shape_rotations(size: usize, shape: &PieceShape) -> [PieceShape; 4] {
    let mut rotates = [*shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; 4]; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[PieceShape; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, &[EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, &[[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, &[[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, &[[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, &[[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, &[[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, &[[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in PieceRotation::ALL {
                assert_eq!(
                    kind.occupied_offsets(rotation).count(),
                    4,
                    "{kind:?} rotation {rotation:?}"
                );
            }
        }
    }

    #[test]
    fn test_spawn_cells_match_a_rotation() {
        // The spawn footprint must be one of the kind's placements, otherwise the
        // tracker could never explain a freshly spawned piece.
        for kind in PieceKind::ALL {
            let spawn = kind.spawn_board();
            assert!(
                Piece::all_placements(kind).any(|piece| piece.to_bit_board() == Some(spawn)),
                "{kind:?}"
            );
        }
    }

    #[test]
    fn test_cells_out_of_bounds() {
        let piece = Piece::new(PieceKind::I, PieceRotation::default(), 7, 0);
        assert_eq!(piece.cells(), None);
        let piece = Piece::new(PieceKind::I, PieceRotation::default(), 6, -1);
        assert_eq!(piece.cells(), Some([(6, 0), (7, 0), (8, 0), (9, 0)]));
        let piece = Piece::new(PieceKind::O, PieceRotation::default(), 0, 19);
        assert_eq!(piece.cells(), None);
    }

    #[test]
    fn test_all_placements_count() {
        // Horizontal I: 7 columns x 20 rows; vertical I: 10 columns x 17 rows.
        let count = Piece::all_placements(PieceKind::I).count();
        assert_eq!(count, 2 * (7 * 20) + 2 * (10 * 17));
        // O never changes shape: 9 x 19 per rotation.
        assert_eq!(Piece::all_placements(PieceKind::O).count(), 4 * 9 * 19);
    }

    #[test]
    fn test_color_roles() {
        let roles = PieceKind::ALL.map(PieceKind::color_role);
        assert_eq!(
            roles,
            [
                ColorRole::White,
                ColorRole::White,
                ColorRole::Primary,
                ColorRole::Secondary,
                ColorRole::Primary,
                ColorRole::Secondary,
                ColorRole::White,
            ]
        );
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('x'), None);
    }
}
