//! Small statistics toolkit used by the tetrack estimator.
//!
//! - [`median`]: linear and circular medians, used to learn colors from samples
//! - [`descriptive`]: summary statistics for reporting
//!
//! # Examples
//!
//! ```
//! use tetrack_stats::median::{circular_median_degrees, median};
//!
//! assert_eq!(median([3.0, 1.0, 4.0, 2.0]).unwrap(), 2.5);
//!
//! // Hues on both sides of 0° average to a hue near 0°, not 180°.
//! let hue = circular_median_degrees([350.0, 355.0, 5.0, 10.0]).unwrap();
//! assert!(hue < 5.0 || hue > 355.0);
//! ```

pub mod descriptive;
pub mod median;

/// A statistic was requested over a sample with no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("statistic requested over an empty sample")]
pub struct EmptySampleError;
