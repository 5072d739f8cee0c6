use tracing::info;

use crate::{OcrContext, OcrFrame, PersistenceStrategy, StateEvent, StateId};

/// Detects a game reset to the title screen while a game is in progress.
///
/// Fires after 5 frames in a row showing an empty board and both counters at
/// zero, once the session has recorded some progress.
#[derive(Debug)]
pub struct RestartGameEvent {
    persistence: PersistenceStrategy,
}

impl RestartGameEvent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            persistence: PersistenceStrategy::consecutive(5),
        }
    }
}

impl Default for RestartGameEvent {
    fn default() -> Self {
        Self::new()
    }
}

impl StateEvent for RestartGameEvent {
    super::event_accessors!("RestartGameEvent");

    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool {
        ctx.session.status().has_progress()
            && frame.binary_board().is_empty()
            && frame.read_lines(false) == Some(0)
            && frame.read_score(false) == Some(0)
    }

    fn trigger(&mut self, ctx: &mut OcrContext, _frame: &dyn OcrFrame) -> Option<StateId> {
        let status = ctx.session.status();
        info!(
            level = status.level(),
            lines = status.lines(),
            score = status.score(),
            "game restarted"
        );
        ctx.session.end_game();
        Some(StateId::BeforeGame)
    }
}
