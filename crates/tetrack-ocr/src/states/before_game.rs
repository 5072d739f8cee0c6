use crate::{
    OcrConfig, OcrContext, OcrError, OcrFrame, StateBehavior, StateEvent, StateId,
    events::StartGameEvent,
};

/// Waits for the counters of a fresh game to appear.
///
/// Nothing is published while waiting.
#[derive(Debug, Default)]
pub struct BeforeGame;

impl StateBehavior for BeforeGame {
    const ID: StateId = StateId::BeforeGame;

    fn enter(_ctx: &mut OcrContext) -> Self {
        Self
    }

    fn events(_config: &OcrConfig) -> Vec<Box<dyn StateEvent>> {
        vec![Box::new(StartGameEvent::new())]
    }

    fn advance_frame(
        &mut self,
        _ctx: &mut OcrContext,
        _frame: &dyn OcrFrame,
    ) -> Result<(), OcrError> {
        Ok(())
    }
}
