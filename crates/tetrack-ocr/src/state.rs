use std::fmt;

use serde::{Deserialize, Serialize};
use tetrack_engine::GameSession;
use tracing::debug;

use crate::{
    color::ColorClassifier, config::OcrConfig, error::OcrError, frame::OcrFrame,
    persistence::PersistenceStrategy, tracker::StackTracker,
};

/// Identifies the states of the estimator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum StateId {
    /// Waiting for a game to start.
    BeforeGame,
    /// Every placement is being verified.
    Running,
    /// Tracking with degraded confidence.
    Limbo,
    /// The game is over.
    GameEnd,
}

/// Everything a state and its events may look at or update.
#[derive(Debug)]
pub struct OcrContext {
    pub config: OcrConfig,
    pub session: GameSession,
    pub colors: ColorClassifier,
    pub tracker: StackTracker,
}

impl OcrContext {
    #[must_use]
    pub fn new(config: OcrConfig, session: GameSession) -> Self {
        Self {
            config,
            session,
            colors: ColorClassifier::new(),
            tracker: StackTracker::new(),
        }
    }

    /// Checks whether the frame looks like a clean board.
    #[must_use]
    pub fn is_low_noise(&self, frame: &dyn OcrFrame) -> bool {
        frame.board_noise() <= self.config.noise_threshold
    }
}

/// A debounced condition that can move the machine to another state.
///
/// The machine polls the event's [`PersistenceStrategy`] with the result of
/// [`precondition`] on every frame, and runs [`trigger`] once the strategy is
/// satisfied. A trigger returning `None` keeps the current state.
///
/// [`precondition`]: Self::precondition
/// [`trigger`]: Self::trigger
pub trait StateEvent: fmt::Debug + Send {
    fn name(&self) -> &'static str;

    fn persistence_mut(&mut self) -> &mut PersistenceStrategy;

    /// Evaluates the condition on the current frame.
    fn precondition(&mut self, ctx: &OcrContext, frame: &dyn OcrFrame) -> bool;

    /// Acts on the satisfied event and names the state to move to.
    fn trigger(&mut self, ctx: &mut OcrContext, frame: &dyn OcrFrame) -> Option<StateId>;
}

/// Per-state data and behavior.
///
/// # Lifecycle
///
/// 1. **[`enter`]** - The state becomes active and builds its data from the context
/// 2. **[`events`]** - Fresh events are registered, in evaluation order
/// 3. **[`advance_frame`]** - Called on each frame, before the events are evaluated
/// 4. **Dropped** - An event triggered a transition
///
/// [`enter`]: Self::enter
/// [`events`]: Self::events
/// [`advance_frame`]: Self::advance_frame
pub trait StateBehavior: fmt::Debug + Send + Sized + 'static {
    const ID: StateId;

    fn enter(ctx: &mut OcrContext) -> Self;

    fn events(config: &OcrConfig) -> Vec<Box<dyn StateEvent>>;

    /// Updates the estimate from the frame and publishes it to the session.
    ///
    /// # Errors
    ///
    /// Returns an error on a structural failure; the frame is abandoned.
    fn advance_frame(&mut self, ctx: &mut OcrContext, frame: &dyn OcrFrame)
    -> Result<(), OcrError>;
}

/// A state entered by the machine: its behavior plus its registered events.
#[derive(Debug)]
pub struct OcrState<S> {
    behavior: S,
    events: Vec<Box<dyn StateEvent>>,
}

impl<S> OcrState<S>
where
    S: StateBehavior,
{
    #[must_use]
    pub fn enter(ctx: &mut OcrContext) -> Self {
        let behavior = S::enter(ctx);
        let events = S::events(&ctx.config);
        Self { behavior, events }
    }

}

/// Type-erased [`OcrState`], as held by the machine.
pub trait ActiveState: fmt::Debug + Send {
    fn id(&self) -> StateId;

    /// Names of the registered events, in evaluation order.
    fn event_names(&self) -> Vec<&'static str>;

    /// Runs the per-frame hook, then evaluates the events.
    ///
    /// Every event's persistence is polled, in registration order, before any
    /// trigger runs. Triggers of satisfied events then run in the same order and
    /// the first one naming a state wins.
    ///
    /// # Errors
    ///
    /// Propagates errors of the per-frame hook.
    fn advance_frame(
        &mut self,
        ctx: &mut OcrContext,
        frame: &dyn OcrFrame,
    ) -> Result<Option<StateId>, OcrError>;
}

impl<S> ActiveState for OcrState<S>
where
    S: StateBehavior,
{
    fn id(&self) -> StateId {
        S::ID
    }

    fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(|event| event.name()).collect()
    }

    fn advance_frame(
        &mut self,
        ctx: &mut OcrContext,
        frame: &dyn OcrFrame,
    ) -> Result<Option<StateId>, OcrError> {
        self.behavior.advance_frame(ctx, frame)?;

        let now = frame.timestamp();
        let satisfied = self
            .events
            .iter_mut()
            .map(|event| {
                let condition = event.precondition(ctx, frame);
                event.persistence_mut().poll(condition, now)
            })
            .collect::<Vec<_>>();

        for (event, _) in self
            .events
            .iter_mut()
            .zip(satisfied)
            .filter(|(_, satisfied)| *satisfied)
        {
            if let Some(next) = event.trigger(ctx, frame) {
                debug!(event = event.name(), state = %S::ID, %next, "event triggered");
                return Ok(Some(next));
            }
        }
        Ok(None)
    }
}
