use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Drops to limbo when placements can no longer be verified.
///
/// Fires after 5 frames in a row where the board is noisy or the tracker has
/// lost the stack.
#[derive(Debug)]
pub struct ConfusionEvent {
    persistence: PersistenceStrategy,
}

impl ConfusionEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::consecutive(5),
        }
    }
}

impl Default for ConfusionEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for ConfusionEvent {
    super::event_accessors!("ConfusionEvent");

    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        !ctx.is_low_noise(frame) || ctx.tracker.is_desynced()
    }

    fn trigger(&mut self, _ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        Some(StateId::Limbo)
    }
}
