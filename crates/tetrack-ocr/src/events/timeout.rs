use std::time::Duration;

use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Level from which the game keeps cycling palettes and limbo is expected.
pub const COLORS_LEVEL: u32 = 138;

/// Ends a game that stays in limbo for 10 seconds below [`COLORS_LEVEL`].
///
/// Only registered when [`OcrConfig::limbo_timeout`](crate::OcrConfig::limbo_timeout)
/// is set.
#[derive(Debug)]
pub struct TimeoutEvent {
    persistence: PersistenceStrategy,
}

impl TimeoutEvent {
    pub const DURATION: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::timed(Self::DURATION),
        }
    }
}

impl Default for TimeoutEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for TimeoutEvent {
    super::event_accessors!("TimeoutEvent");

    fn precondition(&mut self, ctx: &OcrContext, _frame: &dyn OcrFrame) -> bool {
        ctx.session.status().level() < COLORS_LEVEL
    }

    fn trigger(&mut self, _ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        Some(StateId::GameEnd)
    }
}
