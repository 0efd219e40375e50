pub mod detection;
pub mod streak;

pub use detection::{DetectionCounters, DetectionOutcome, DetectionState, SeenIdsChange};
pub use streak::{StreakState, DEFAULT_DAILY_GOAL};
