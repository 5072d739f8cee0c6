use tracing::info;

use crate::{
    ColorClassifier, OcrContext, OcrFrame, PersistenceStrategy, StackTracker, StateEvent, StateId,
};

/// Starts a game once a fresh game screen has been seen on 3 frames in a row.
///
/// A fresh game shows a clean board, a next piece, and both counters at zero.
#[derive(Debug)]
pub struct StartGameEvent {
    persistence: PersistenceStrategy,
}

impl StartGameEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::consecutive(3),
        }
    }
}

impl Default for StartGameEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for StartGameEvent {
    super::event_accessors!("StartGameEvent");

    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        ctx.is_low_noise(frame)
            && frame.next_piece().is_some()
            && frame.read_lines(false) == Some(0)
            && frame.read_score(false) == Some(0)
    }

    fn trigger(&mut self, ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        ctx.session.start_game();
        ctx.colors = ColorClassifier::new();
        ctx.tracker = StackTracker::new();
        info!(
            start_level = ctx.session.start_level(),
            game = ctx.session.games_started(),
            "game started"
        );
        Some(StateId::Running)
    }
}

#[cfg(test)]
mod tests {
    use tetrack_engine::PieceKind;

    use super::*;
    use crate::{
        OcrConfig,
        events::test_util::{context, fires},
        recording::{CounterRead, RecordedFrame},
    };

    fn title_frame(next: Option<PieceKind>, lines: u32) -> RecordedFrame {
        RecordedFrame {
            next,
            lines: CounterRead::full(lines),
            score: CounterRead::full(0),
            ..RecordedFrame::default()
        }
    }

    #[test]
    fn test_fires_on_third_fresh_frame() {
        let mut ctx = context(OcrConfig::default());
        let mut event = StartGameEvent::new();
        let frame = title_frame(Some(PieceKind::T), 0);
        assert!(!fires(&mut event, &mut ctx, &frame));
        assert!(!fires(&mut event, &mut ctx, &frame));
        assert!(fires(&mut event, &mut ctx, &frame));
        assert!(ctx.session.session_state().is_playing());
    }

    #[test]
    fn test_requires_next_piece_and_zero_counters() {
        let ctx = context(OcrConfig::default());
        let mut event = StartGameEvent::new();
        assert!(!event.precondition(&ctx, &title_frame(None, 0)));
        assert!(!event.precondition(&ctx, &title_frame(Some(PieceKind::I), 3)));

        let noisy = RecordedFrame {
            noise: 0.9,
            ..title_frame(Some(PieceKind::I), 0)
        };
        assert!(!event.precondition(&ctx, &noisy));
    }
}
