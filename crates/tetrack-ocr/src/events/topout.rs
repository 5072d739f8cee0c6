use std::time::Duration;

use tetrack_engine::{BitBoard, PieceKind};

use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Ends the game when the spawn area stays blocked.
///
/// After a top-out the last piece sits frozen in the spawn area. A falling piece
/// leaves the spawn area well within a second even at level 0, so a board that
/// is unchanged for one second with a mino in the spawn area is a topped-out
/// game.
#[derive(Debug)]
pub struct TopoutEvent {
    persistence: PersistenceStrategy,
    spawn_area: BitBoard,
    previous: BitBoard,
}

impl TopoutEvent {
    pub const DURATION: Duration = Duration::from_secs(1);

    #[must_use]
    pub fn new() -> Self {
        let spawn_area = PieceKind::ALL
            .iter()
            .fold(BitBoard::EMPTY, |area, kind| area.union(&kind.spawn_board()));
        Self {
            persistence: PersistenceStrategy::timed(Self::DURATION),
            spawn_area,
            previous: BitBoard::EMPTY,
        }
    }
}

impl Default for TopoutEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for TopoutEvent {
    super::event_accessors!("TopoutEvent");

    fn precondition(&mut self, _ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        let board = frame.binary_board();
        let frozen = board == self.previous;
        self.previous = board;
        frozen && board.intersects(&self.spawn_area)
    }

    fn trigger(&mut self, _ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        Some(StateId::GameEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        OcrConfig,
        events::test_util::{context, fires},
        recording::RecordedFrame,
    };

    fn frame(time_ms: u64, board: BitBoard) -> RecordedFrame {
        RecordedFrame {
            time_ms,
            board,
            ..RecordedFrame::default()
        }
    }

    #[test]
    fn test_fires_when_spawn_area_stays_blocked() {
        let mut ctx = context(OcrConfig::default());
        let mut event = TopoutEvent::new();
        let board = PieceKind::S.spawn_board();

        assert!(!fires(&mut event, &mut ctx, &frame(0, board)));
        assert!(!fires(&mut event, &mut ctx, &frame(500, board)));
        assert!(!fires(&mut event, &mut ctx, &frame(1_499, board)));
        assert!(fires(&mut event, &mut ctx, &frame(1_500, board)));
    }

    #[test]
    fn test_ignores_frozen_board_below_spawn_area() {
        let mut ctx = context(OcrConfig::default());
        let mut event = TopoutEvent::new();
        let board = BitBoard::from_ascii("####.#####");

        for time_ms in [0, 1_000, 5_000] {
            assert!(!fires(&mut event, &mut ctx, &frame(time_ms, board)));
        }
    }

    #[test]
    fn test_falling_piece_restarts_timer() {
        let mut ctx = context(OcrConfig::default());
        let mut event = TopoutEvent::new();
        let spawned = PieceKind::I.spawn_board();
        let mut fallen = BitBoard::EMPTY;
        for x in 3..7 {
            fallen.occupy(x, 1);
        }

        assert!(!fires(&mut event, &mut ctx, &frame(0, spawned)));
        assert!(!fires(&mut event, &mut ctx, &frame(600, spawned)));
        assert!(!fires(&mut event, &mut ctx, &frame(1_200, fallen)));
        assert!(!fires(&mut event, &mut ctx, &frame(1_700, spawned)));
    }
}
