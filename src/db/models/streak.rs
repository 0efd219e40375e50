use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_GOAL: u32 = 100;

/// Persisted goal streak. `last_streak_date` is the last day the goal was credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub last_streak_date: Option<NaiveDate>,
    pub current_streak: u32,
}
