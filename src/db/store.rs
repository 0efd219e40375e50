//! Key/value persistence contract consumed by the detection and streak logic.
//!
//! | key | written by |
//! |---|---|
//! | `unique_count`, `total_detections`, `ad_count`, `seen_ids`, `last_update` | detection tracker |
//! | `daily_goal`, `notifications_enabled` | configuration |
//! | `last_streak_date`, `current_streak` | streak controller |

use std::future::Future;

use anyhow::Result;

use super::models::{DetectionCounters, DetectionState, SeenIdsChange, StreakState};

pub trait StatsStore: Send + Sync + 'static {
    fn load_detection_state(&self) -> impl Future<Output = Result<DetectionState>> + Send;

    /// Write all counters plus the seen-id change as one atomic unit.
    fn save_detection_state(
        &self,
        counters: &DetectionCounters,
        seen: SeenIdsChange,
        written_at_ms: i64,
    ) -> impl Future<Output = Result<()>> + Send;

    fn load_streak_state(&self) -> impl Future<Output = Result<StreakState>> + Send;

    fn save_streak_state(&self, state: StreakState) -> impl Future<Output = Result<()>> + Send;

    /// Stored goal, or the default when never configured.
    fn load_daily_goal(&self) -> impl Future<Output = Result<u32>> + Send;

    fn save_daily_goal(&self, goal: u32) -> impl Future<Output = Result<()>> + Send;

    /// Reminder toggle. Enabled unless explicitly switched off.
    fn load_notifications_enabled(&self) -> impl Future<Output = Result<bool>> + Send;

    fn save_notifications_enabled(&self, enabled: bool) -> impl Future<Output = Result<()>> + Send;
}
