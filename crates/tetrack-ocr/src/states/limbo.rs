use tetrack_engine::PieceKind;

use crate::{
    CounterReconciler, OcrConfig, OcrContext, OcrError, OcrFrame, StateBehavior, StateEvent,
    StateId,
    events::{
        ExitEvent, LinecapEvent, RecoveryEvent, RestartGameEvent, StuckEvent, TimeoutEvent,
        TopoutEvent,
    },
};

/// Degraded-confidence tracking.
///
/// Placements are not verified; the board is classified by color alone and the
/// next piece and counters are only refreshed on poll frames. The tracker keeps
/// watching so that a verified placement can bring the machine back to
/// [`Running`](super::Running).
#[derive(Debug)]
pub struct Limbo {
    counters: CounterReconciler,
    next: Option<PieceKind>,
}

impl StateBehavior for Limbo {
    const ID: StateId = StateId::Limbo;

    fn enter(ctx: &mut OcrContext) -> Self {
        Self {
            counters: CounterReconciler::new(
                ctx.session.status(),
                ctx.config.counter_poll_interval,
            ),
            next: ctx.session.next_piece(),
        }
    }

    fn events(config: &OcrConfig) -> Vec<Box<dyn StateEvent>> {
        let mut events: Vec<Box<dyn StateEvent>> = vec![
            Box::new(RestartGameEvent::new()),
            Box::new(LinecapEvent::new()),
            Box::new(RecoveryEvent::new()),
            Box::new(ExitEvent::new()),
            Box::new(StuckEvent::new()),
            Box::new(TopoutEvent::new()),
        ];
        if config.limbo_timeout {
            events.push(Box::new(TimeoutEvent::new()));
        }
        events
    }

    fn advance_frame(&mut self, ctx: &mut OcrContext, frame: &dyn OcrFrame) -> Result<(), OcrError> {
        let next = frame.next_piece();
        ctx.tracker.observe(frame.binary_board(), next);

        if self.counters.is_poll_frame() {
            if next.is_some() {
                self.next = next;
            }
            self.counters.update_counters(frame, &mut ctx.session);
        }
        let level = self.counters.level();

        let board = frame.color_board(level, &ctx.colors)?;
        ctx.session.set_full_state(
            board,
            self.next,
            level,
            self.counters.lines(),
            self.counters.score(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tetrack_engine::{GameSession, SessionConfig};

    use super::*;
    use crate::{
        ActiveState, OcrState,
        recording::{CounterRead, RecordedFrame},
    };

    fn limbo_context() -> OcrContext {
        let mut session = GameSession::new(SessionConfig {
            start_level: 18,
            maxout_capped: false,
        });
        session.start_game();
        OcrContext::new(OcrConfig::default(), session)
    }

    fn frame(time_ms: u64, next: PieceKind, lines: u32) -> RecordedFrame {
        RecordedFrame {
            time_ms,
            next: Some(next),
            lines: CounterRead::full(lines),
            score: CounterRead::full(lines * 100),
            ..RecordedFrame::default()
        }
    }

    #[test]
    fn test_next_and_counters_refresh_on_poll_frames() {
        let mut ctx = limbo_context();
        let mut state = OcrState::<Limbo>::enter(&mut ctx);

        state
            .advance_frame(&mut ctx, &frame(0, PieceKind::T, 2))
            .unwrap();
        let snapshot = ctx.session.snapshot().unwrap();
        assert_eq!(snapshot.next, Some(PieceKind::T));
        assert_eq!(snapshot.lines, 2);

        for i in 1..10 {
            state
                .advance_frame(&mut ctx, &frame(i * 33, PieceKind::J, 3))
                .unwrap();
        }
        let snapshot = ctx.session.snapshot().unwrap();
        assert_eq!(snapshot.next, Some(PieceKind::T));
        assert_eq!(snapshot.lines, 2);

        state
            .advance_frame(&mut ctx, &frame(330, PieceKind::J, 3))
            .unwrap();
        let snapshot = ctx.session.snapshot().unwrap();
        assert_eq!(snapshot.next, Some(PieceKind::J));
        assert_eq!(snapshot.lines, 3);
        assert_eq!(snapshot.score, 300);
    }

    #[test]
    fn test_timeout_registered_only_when_enabled() {
        let names = |config: &OcrConfig| {
            Limbo::events(config)
                .iter()
                .map(|event| event.name())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(&OcrConfig::default()),
            [
                "RestartGameEvent",
                "LinecapEvent",
                "RecoveryEvent",
                "ExitEvent",
                "StuckEvent",
                "TopoutEvent"
            ]
        );
        let config = OcrConfig {
            limbo_timeout: true,
            ..OcrConfig::default()
        };
        assert_eq!(names(&config).last(), Some(&"TimeoutEvent"));
    }
}
