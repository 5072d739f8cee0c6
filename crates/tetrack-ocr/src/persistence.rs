use std::time::Duration;

/// Debounce policy deciding when a per-frame condition is acted on.
///
/// Each event owns its own instance; polling it with the condition observed on
/// the current frame tells whether the condition has held long enough.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tetrack_ocr::PersistenceStrategy;
///
/// let mut strategy = PersistenceStrategy::consecutive(2);
/// assert!(!strategy.poll(true, Duration::ZERO));
/// assert!(strategy.poll(true, Duration::from_millis(33)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum PersistenceStrategy {
    /// Satisfied on any frame the condition holds.
    SingleFrame,
    /// Satisfied once the condition held on `required` polls in a row.
    Consecutive { required: u32, count: u32 },
    /// Satisfied once the condition held for `required` of frame time.
    Timed {
        required: Duration,
        since: Option<Duration>,
    },
}

impl PersistenceStrategy {
    #[must_use]
    pub const fn single_frame() -> Self {
        Self::SingleFrame
    }

    #[must_use]
    pub const fn consecutive(required: u32) -> Self {
        Self::Consecutive { required, count: 0 }
    }

    #[must_use]
    pub const fn timed(required: Duration) -> Self {
        Self::Timed {
            required,
            since: None,
        }
    }

    /// Records the condition observed at frame time `now` and returns whether
    /// the strategy is satisfied.
    ///
    /// A false condition resets any accumulated run.
    pub fn poll(&mut self, condition: bool, now: Duration) -> bool {
        if !condition {
            self.reset();
            return false;
        }
        match self {
            Self::SingleFrame => true,
            Self::Consecutive { required, count } => {
                *count = count.saturating_add(1);
                *count >= *required
            }
            Self::Timed { required, since } => {
                let start = *since.get_or_insert(now);
                now.saturating_sub(start) >= *required
            }
        }
    }

    pub fn reset(&mut self) {
        match self {
            Self::SingleFrame => {}
            Self::Consecutive { count, .. } => *count = 0,
            Self::Timed { since, .. } => *since = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_single_frame_has_no_memory() {
        let mut strategy = PersistenceStrategy::single_frame();
        assert!(strategy.poll(true, ms(0)));
        assert!(!strategy.poll(false, ms(1)));
        assert!(strategy.poll(true, ms(2)));
    }

    #[test]
    fn test_consecutive_resets_on_false() {
        let mut strategy = PersistenceStrategy::consecutive(3);
        assert!(!strategy.poll(true, ms(0)));
        assert!(!strategy.poll(true, ms(0)));
        assert!(!strategy.poll(false, ms(0)));
        assert!(!strategy.poll(true, ms(0)));
        assert!(!strategy.poll(true, ms(0)));
        assert!(strategy.poll(true, ms(0)));
        assert!(strategy.poll(true, ms(0)));
    }

    #[test]
    fn test_timed_measures_frame_time() {
        let mut strategy = PersistenceStrategy::timed(ms(3000));
        assert!(!strategy.poll(true, ms(1000)));
        assert!(!strategy.poll(true, ms(3999)));
        assert!(strategy.poll(true, ms(4000)));
    }

    #[test]
    fn test_timed_resets_on_false() {
        let mut strategy = PersistenceStrategy::timed(ms(3000));
        assert!(!strategy.poll(true, ms(0)));
        assert!(!strategy.poll(false, ms(2500)));
        assert!(!strategy.poll(true, ms(3000)));
        assert!(!strategy.poll(true, ms(5999)));
        assert!(strategy.poll(true, ms(6000)));
    }

    #[test]
    fn test_explicit_reset() {
        let mut strategy = PersistenceStrategy::consecutive(2);
        strategy.poll(true, ms(0));
        strategy.reset();
        assert!(!strategy.poll(true, ms(0)));
        assert!(strategy.poll(true, ms(0)));
    }
}
