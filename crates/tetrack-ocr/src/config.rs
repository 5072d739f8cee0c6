use serde::{Deserialize, Serialize};

/// Tuning of the estimator, fixed for the lifetime of a state machine.
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// use tetrack_ocr::OcrConfig;
///
/// let config: OcrConfig = serde_json::from_str(r#"{ "level_cap": 29 }"#).unwrap();
/// assert_eq!(config.level_cap, Some(29));
/// assert_eq!(config.counter_poll_interval, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Level at which the game is ended. `None` disables the level cap.
    pub level_cap: Option<u32>,
    /// Read the counters every this many frames.
    pub counter_poll_interval: u32,
    /// Board noise above which the feed is considered not to show a board.
    pub noise_threshold: f32,
    /// Ends a game stuck in limbo for 10 seconds below the colors level.
    pub limbo_timeout: bool,
}

impl OcrConfig {
    pub const DEFAULT_COUNTER_POLL_INTERVAL: u32 = 10;
    pub const DEFAULT_NOISE_THRESHOLD: f32 = 0.25;
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            level_cap: None,
            counter_poll_interval: Self::DEFAULT_COUNTER_POLL_INTERVAL,
            noise_threshold: Self::DEFAULT_NOISE_THRESHOLD,
            limbo_timeout: false,
        }
    }
}
