use tracing::info;

use crate::{OcrConfig, OcrContext, OcrError, OcrFrame, StateBehavior, StateEvent, StateId};

/// Terminal state: the game of the session is over.
#[derive(Debug, Default)]
pub struct GameEnd;

impl StateBehavior for GameEnd {
    const ID: StateId = StateId::GameEnd;

    fn enter(ctx: &mut OcrContext) -> Self {
        ctx.session.end_game();
        let status = ctx.session.status();
        info!(
            level = status.level(),
            lines = status.lines(),
            score = status.score(),
            rollovers = ctx.session.profile().rollovers(),
            linecap = ctx.session.is_linecap_reached(),
            "game ended"
        );
        Self
    }

    fn events(_config: &OcrConfig) -> Vec<Box<dyn StateEvent>> {
        Vec::new()
    }

    fn advance_frame(
        &mut self,
        _ctx: &mut OcrContext,
        _frame: &dyn OcrFrame,
    ) -> Result<(), OcrError> {
        Ok(())
    }
}
