use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Returns from limbo as soon as a placement is verified on a clean board.
#[derive(Debug)]
pub struct RecoveryEvent {
    persistence: PersistenceStrategy,
}

impl RecoveryEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::single_frame(),
        }
    }
}

impl Default for RecoveryEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for RecoveryEvent {
    super::event_accessors!("RecoveryEvent");

    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        ctx.is_low_noise(frame) && ctx.tracker.last_event().is_locked()
    }

    fn trigger(&mut self, _ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        Some(StateId::Running)
    }
}
