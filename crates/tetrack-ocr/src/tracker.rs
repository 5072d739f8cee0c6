use tetrack_engine::{BitBoard, ColorRole, Piece, PieceKind, RoleBoard};
use tracing::debug;

use crate::{color::ColorClassifier, error::ColorError, frame::OcrFrame};

/// What the tracker learned from a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum TrackEvent {
    /// No spawn was seen.
    #[default]
    Idle,
    /// A piece spawned while no placement could be checked.
    Spawned(PieceKind),
    /// A piece spawned and the previous one was found locked in the stack.
    Locked { piece: Piece, cleared_lines: usize },
    /// A piece spawned but the stack cannot be explained by the previous piece.
    Desynced,
}

/// Follows the stack from spawn to spawn, verifying each placement.
///
/// A spawn is detected when the spawn cells of the piece last shown in the next
/// box appear on the board. At that moment the rest of the board is the settled
/// stack, which must equal the previously tracked stack plus one placement of the
/// previous piece, after line clears. Cells of verified placements carry the
/// role of their piece, so they can be used to learn the mino colors.
///
/// The next box must have been read again since the last spawn before another
/// spawn is accepted, and a piece that re-enters its spawn cells before anything
/// locked is not a spawn.
#[derive(Debug, Clone, Default)]
pub struct StackTracker {
    stack: BitBoard,
    /// Roles of the stack cells that come from verified placements.
    roles: RoleBoard,
    active: Option<PieceKind>,
    next: Option<PieceKind>,
    /// `next` was read on a frame after the last spawn.
    next_fresh: bool,
    previous_board: BitBoard,
    desynced: bool,
    last_event: TrackEvent,
}

impl StackTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack cells whose roles are known from verified placements.
    #[must_use]
    pub fn trusted_board(&self) -> &RoleBoard {
        &self.roles
    }

    #[must_use]
    pub fn stack(&self) -> &BitBoard {
        &self.stack
    }

    /// The piece currently falling, if one has been seen spawning.
    #[must_use]
    pub fn active_piece(&self) -> Option<PieceKind> {
        self.active
    }

    /// Checks whether the last placement could not be verified.
    ///
    /// Cleared by the next verified placement.
    #[must_use]
    pub fn is_desynced(&self) -> bool {
        self.desynced
    }

    /// Event produced by the latest observed frame.
    #[must_use]
    pub fn last_event(&self) -> TrackEvent {
        self.last_event
    }

    /// Feeds the board and next box recognized on a frame.
    pub fn observe(&mut self, board: BitBoard, next: Option<PieceKind>) -> TrackEvent {
        let spawned = self
            .next
            .filter(|kind| self.next_fresh && self.is_spawn(*kind, &board));
        let event = match spawned {
            Some(kind) => self.on_spawn(kind, &board),
            None => TrackEvent::Idle,
        };
        if next.is_some() {
            self.next = next;
            self.next_fresh = event.is_idle();
        } else if !event.is_idle() {
            self.next_fresh = false;
        }
        self.previous_board = board;
        self.last_event = event;
        event
    }

    /// Builds the published board of a frame.
    ///
    /// While the tracked stack is fully visible, its verified cells keep their
    /// roles; every other occupied cell is classified by color.
    ///
    /// # Errors
    ///
    /// Propagates structural errors of the color table.
    pub fn role_board<F>(
        &self,
        frame: &F,
        level: u32,
        colors: &ColorClassifier,
    ) -> Result<RoleBoard, ColorError>
    where
        F: OcrFrame + ?Sized,
    {
        let bitmap = frame.binary_board();
        let stack_visible = self.stack.is_subset_of(&bitmap);
        let mut board = RoleBoard::EMPTY;
        for (x, y) in bitmap.occupied_cells() {
            let role = match self.roles.get(x, y) {
                ColorRole::Empty => colors.classify(level, frame.raw_mino_color(x, y))?,
                role if stack_visible => role,
                _ => colors.classify(level, frame.raw_mino_color(x, y))?,
            };
            board.set(x, y, role);
        }
        Ok(board)
    }

    fn is_spawn(&self, kind: PieceKind, board: &BitBoard) -> bool {
        let spawn = kind.spawn_board();
        spawn.is_subset_of(board)
            && !spawn.is_subset_of(&self.previous_board)
            && !spawn.intersects(&self.stack)
    }

    fn on_spawn(&mut self, kind: PieceKind, board: &BitBoard) -> TrackEvent {
        let settled = board.difference(&kind.spawn_board());
        let event = match self.active {
            None => {
                self.reseed(settled);
                TrackEvent::Spawned(kind)
            }
            // The falling piece left its spawn cells and came back.
            Some(_) if settled == self.stack => return TrackEvent::Idle,
            Some(previous) => match self.find_placement(previous, &settled) {
                Some(piece) => self.lock(piece),
                None => {
                    debug!(?previous, "stack does not match any placement");
                    self.reseed(settled);
                    self.desynced = true;
                    TrackEvent::Desynced
                }
            },
        };
        self.active = Some(kind);
        event
    }

    fn find_placement(&self, kind: PieceKind, settled: &BitBoard) -> Option<Piece> {
        Piece::all_placements(kind).find(|piece| {
            let Some(cells) = piece.to_bit_board() else {
                return false;
            };
            if cells.intersects(&self.stack) {
                return false;
            }
            let mut board = self.stack.union(&cells);
            board.clear_lines();
            board == *settled
        })
    }

    fn lock(&mut self, piece: Piece) -> TrackEvent {
        let Some(cells) = piece.to_bit_board() else {
            return TrackEvent::Desynced;
        };
        let mut stack = self.stack.union(&cells);
        let rows = stack.filled_rows();
        let cleared_lines = stack.remove_rows(rows);
        self.stack = stack;
        self.roles.fill_piece(piece);
        self.roles.remove_rows(rows);
        self.desynced = false;
        debug!(kind = ?piece.kind(), cleared_lines, "verified placement");
        TrackEvent::Locked {
            piece,
            cleared_lines,
        }
    }

    fn reseed(&mut self, settled: BitBoard) {
        self.stack = settled;
        self.roles = RoleBoard::EMPTY;
    }
}
