use std::time::Duration;

use tetrack_engine::BitBoard;

use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Ends the game when the board has not changed for 3 seconds.
#[derive(Debug)]
pub struct StuckEvent {
    persistence: PersistenceStrategy,
    previous: BitBoard,
}

impl StuckEvent {
    pub const DURATION: Duration = Duration::from_secs(3);

    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::timed(Self::DURATION),
            previous: BitBoard::EMPTY,
        }
    }
}

impl Default for StuckEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for StuckEvent {
    super::event_accessors!("StuckEvent");

    fn precondition(&mut self, _ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        let board = frame.binary_board();
        let unchanged = board == self.previous;
        self.previous = board;
        unchanged
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

    fn frame(time_ms: u64, art: &str) -> RecordedFrame {
        RecordedFrame {
            time_ms,
            board: BitBoard::from_ascii(art),
            ..RecordedFrame::default()
        }
    }

    #[test]
    fn test_fires_after_three_seconds() {
        let mut ctx = context(OcrConfig::default());
        let mut event = StuckEvent::new();
        let stack = "##..######";

        assert!(!fires(&mut event, &mut ctx, &frame(0, stack)));
        assert!(!fires(&mut event, &mut ctx, &frame(100, stack)));
        assert!(!fires(&mut event, &mut ctx, &frame(3_099, stack)));
        assert!(fires(&mut event, &mut ctx, &frame(3_100, stack)));
    }

    #[test]
    fn test_change_restarts_timer() {
        let mut ctx = context(OcrConfig::default());
        let mut event = StuckEvent::new();

        assert!(!fires(&mut event, &mut ctx, &frame(0, "#.........")));
        assert!(!fires(&mut event, &mut ctx, &frame(100, "#.........")));
        assert!(!fires(&mut event, &mut ctx, &frame(2_000, "##........")));
        assert!(!fires(&mut event, &mut ctx, &frame(3_500, "##........")));
        assert!(!fires(&mut event, &mut ctx, &frame(6_499, "##........")));
        assert!(fires(&mut event, &mut ctx, &frame(6_500, "##........")));
    }

    #[test]
    fn test_empty_board_counts_from_first_frame() {
        let mut ctx = context(OcrConfig::default());
        let mut event = StuckEvent::new();
        assert!(!fires(&mut event, &mut ctx, &frame(1_000, "")));
        assert!(fires(&mut event, &mut ctx, &frame(4_000, "")));
    }
}
