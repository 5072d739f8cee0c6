use crate::{
    CounterReconciler, OcrConfig, OcrContext, OcrError, OcrFrame, StateBehavior, StateEvent,
    StateId,
    TrackEvent,
    events::{ConfusionEvent, LinecapEvent, RestartGameEvent, TopoutEvent},
};

/// Confident tracking: every placement is verified against the stack.
///
/// Verified placements give the roles of their cells, so the published board
/// does not depend on color classification for them, and the mino colors of
/// the level are learned from them.
#[derive(Debug)]
pub struct Running {
    counters: CounterReconciler,
}

impl StateBehavior for Running {
    const ID: StateId = StateId::Running;

    fn enter(ctx: &mut OcrContext) -> Self {
        Self {
            counters: CounterReconciler::new(
                ctx.session.status(),
                ctx.config.counter_poll_interval,
            ),
        }
    }

    fn events(_config: &OcrConfig) -> Vec<Box<dyn StateEvent>> {
        vec![
            Box::new(RestartGameEvent::new()),
            Box::new(LinecapEvent::new()),
            Box::new(ConfusionEvent::new()),
            Box::new(TopoutEvent::new()),
        ]
    }

    fn advance_frame(&mut self, ctx: &mut OcrContext, frame: &dyn OcrFrame) -> Result<(), OcrError> {
        let next = frame.next_piece();
        let event = ctx.tracker.observe(frame.binary_board(), next);

        // A line clear may have moved the level, and with it the palette the
        // locked minos are drawn in.
        let cleared = matches!(event, TrackEvent::Locked { cleared_lines, .. } if cleared_lines > 0);
        if self.counters.is_poll_frame() || cleared {
            self.counters.update_counters(frame, &mut ctx.session);
        }
        let level = self.counters.level();

        if event.is_locked() {
            ctx.colors
                .derive_from_board(frame, ctx.tracker.trusted_board(), level)?;
        }

        let board = ctx.tracker.role_board(frame, level, &ctx.colors)?;
        let next = next.or_else(|| ctx.session.next_piece());
        ctx.session.set_full_state(
            board,
            next,
            level,
            self.counters.lines(),
            self.counters.score(),
        );
        Ok(())
    }
}
