use tracing::info;

use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Ends the game as soon as the configured level cap is reached.
///
/// Never fires when no level cap is configured.
#[derive(Debug)]
pub struct LinecapEvent {
    persistence: PersistenceStrategy,
}

impl LinecapEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::single_frame(),
        }
    }
}

impl Default for LinecapEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for LinecapEvent {
    super::event_accessors!("LinecapEvent");

    fn precondition(&mut self, ctx: &OcrContext, _frame: &dyn OcrFrame) -> bool {
        ctx.config
            .level_cap
            .is_some_and(|cap| ctx.session.status().level() >= cap)
    }

    fn trigger(&mut self, ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        info!(level = ctx.session.status().level(), "level cap reached");
        ctx.session.linecap_reached();
        Some(StateId::GameEnd)
    }
}
