use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Ends the game when the feed stops showing a board for 10 frames in a row.
#[derive(Debug)]
pub struct ExitEvent {
    persistence: PersistenceStrategy,
}

impl ExitEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::consecutive(10),
        }
    }
}

impl Default for ExitEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for ExitEvent {
    super::event_accessors!("ExitEvent");

    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        !ctx.is_low_noise(frame)
    }

    fn trigger(&mut self, _ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        Some(StateId::GameEnd)
    }
}
