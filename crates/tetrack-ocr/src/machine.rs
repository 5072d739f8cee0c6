use tetrack_engine::GameSession;
use tracing::info;

use crate::{
    ActiveState, ColorClassifier, OcrConfig, OcrContext, OcrError, OcrFrame, OcrState, StateId,
    states::{BeforeGame, GameEnd, Limbo, Running},
};

/// Estimates the game state of one session from its frames.
///
/// Frames are evaluated strictly one at a time. Each call to
/// [`advance_frame`](Self::advance_frame) runs the active state and its events,
/// and switches state when an event asks for it.
///
/// # Example
///
/// ```
/// use tetrack_engine::{GameSession, SessionConfig};
/// use tetrack_ocr::{OcrConfig, OcrStateMachine, StateId, recording::RecordedFrame};
///
/// let session = GameSession::new(SessionConfig::default());
/// let mut machine = OcrStateMachine::new(OcrConfig::default(), session);
/// assert_eq!(machine.state_id(), StateId::BeforeGame);
///
/// machine.advance_frame(&RecordedFrame::default())?;
/// assert_eq!(machine.state_id(), StateId::BeforeGame);
/// # Ok::<(), tetrack_ocr::OcrError>(())
/// ```
#[derive(Debug)]
pub struct OcrStateMachine {
    context: OcrContext,
    state: Box<dyn ActiveState>,
}

impl OcrStateMachine {
    #[must_use]
    pub fn new(config: OcrConfig, session: GameSession) -> Self {
        let mut context = OcrContext::new(config, session);
        let state = enter_state(StateId::BeforeGame, &mut context);
        Self { context, state }
    }

    /// Evaluates one frame and returns the state entered on it, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame hits a structural failure. The machine
    /// stays in its current state and the frame is abandoned.
    pub fn advance_frame(&mut self, frame: &dyn OcrFrame) -> Result<Option<StateId>, OcrError> {
        let Some(next) = self.state.advance_frame(&mut self.context, frame)? else {
            return Ok(None);
        };
        info!(
            from = %self.state.id(),
            to = %next,
            time_ms = frame.timestamp().as_millis(),
            "state transition"
        );
        self.state = enter_state(next, &mut self.context);
        Ok(Some(next))
    }

    #[must_use]
    pub fn state_id(&self) -> StateId {
        self.state.id()
    }

    /// Names of the events of the active state, in evaluation order.
    #[must_use]
    pub fn event_names(&self) -> Vec<&'static str> {
        self.state.event_names()
    }

    #[must_use]
    pub fn context(&self) -> &OcrContext {
        &self.context
    }

    #[must_use]
    pub fn config(&self) -> &OcrConfig {
        &self.context.config
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.context.session
    }

    #[must_use]
    pub fn colors(&self) -> &ColorClassifier {
        &self.context.colors
    }

    #[must_use]
    pub fn into_session(self) -> GameSession {
        self.context.session
    }
}

fn enter_state(id: StateId, ctx: &mut OcrContext) -> Box<dyn ActiveState> {
    match id {
        StateId::BeforeGame => Box::new(OcrState::<BeforeGame>::enter(ctx)),
        StateId::Running => Box::new(OcrState::<Running>::enter(ctx)),
        StateId::Limbo => Box::new(OcrState::<Limbo>::enter(ctx)),
        StateId::GameEnd => Box::new(OcrState::<GameEnd>::enter(ctx)),
    }
}
