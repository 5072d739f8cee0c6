//! Events registered by the states.
//!
//! | Event | Persistence | Condition | Next state |
//! |---|---|---|---|
//! | [`StartGameEvent`] | 3 frames | clean board, next piece, counters at 0 | Running |
//! | [`RestartGameEvent`] | 5 frames | empty board, counters back at 0 | `BeforeGame` |
//! | [`LinecapEvent`] | 1 frame | level reached the cap | `GameEnd` |
//! | [`ConfusionEvent`] | 5 frames | noisy board or placement not verified | Limbo |
//! | [`RecoveryEvent`] | 1 frame | clean board and placement verified | Running |
//! | [`ExitEvent`] | 10 frames | noisy board | `GameEnd` |
//! | [`StuckEvent`] | 3 s | board unchanged | `GameEnd` |
//! | [`TopoutEvent`] | 1 s | spawn area occupied, board unchanged | `GameEnd` |
//! | [`TimeoutEvent`] | 10 s | below level 138 | `GameEnd` |

pub use self::{
    confusion::*, exit::*, linecap::*, recovery::*, restart_game::*, start_game::*, stuck::*,
    timeout::*, topout::*,
};

mod confusion;
mod exit;
mod linecap;
mod recovery;
mod restart_game;
mod start_game;
mod stuck;
mod timeout;
mod topout;

/// Implements the accessors of [`StateEvent`](crate::StateEvent) shared by every event.
macro_rules! event_accessors {
    ($name:literal) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn persistence_mut(&mut self) -> &mut $crate::PersistenceStrategy {
            &mut self.persistence
        }
    };
}
use event_accessors;

#[cfg(test)]
mod test_util {
    use tetrack_engine::{GameSession, SessionConfig};

    use crate::{OcrConfig, OcrContext, StateEvent, recording::RecordedFrame};

    pub(super) fn context(config: OcrConfig) -> OcrContext {
        let mut session = GameSession::new(SessionConfig {
            start_level: 18,
            maxout_capped: false,
        });
        session.start_game();
        OcrContext::new(config, session)
    }

    /// Polls the event as the machine does and returns whether it fired.
    pub(super) fn fires(
        event: &mut dyn StateEvent,
        ctx: &mut OcrContext,
        frame: &RecordedFrame,
    ) -> bool {
        let condition = event.precondition(ctx, frame);
        event
            .persistence_mut()
            .poll(condition, std::time::Duration::from_millis(frame.time_ms))
            && event.trigger(ctx, frame).is_some()
    }
}
