use rand::Rng;
use serde::Serialize;

use crate::coach::{
    coach_chat_message, coach_message, goal_reached_message, milestone_crossed, ProgressStage,
};
use crate::counter::Overview;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub unique_count: u64,
    pub total_detections: u64,
    pub ad_count: u64,
    pub daily_goal: u32,
    pub streak: u32,
    pub remaining: u64,
    pub progress: f64,
    pub stage: ProgressStage,
    pub coach_message: String,
    pub chat_message: String,
    /// Set once per newly reached multiple of 100 unique reels.
    pub celebrate: bool,
    pub notifications_enabled: bool,
}

/// Read-side view model. Remembers the last celebrated count between refreshes.
#[derive(Debug, Default)]
pub struct Dashboard {
    last_celebrated: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh<R: Rng + ?Sized>(&mut self, overview: &Overview, rng: &mut R) -> DashboardSnapshot {
        let unique = overview.stats.unique_count;
        let goal = overview.daily_goal;
        let remaining = u64::from(goal).saturating_sub(unique);

        // counts only drop on reset
        if unique < self.last_celebrated {
            self.last_celebrated = unique;
        }
        let celebrate = milestone_crossed(self.last_celebrated, unique);
        if celebrate {
            self.last_celebrated = unique;
        }

        let coach_message = if remaining > 0 {
            coach_message(remaining, rng)
        } else {
            goal_reached_message(goal)
        };

        DashboardSnapshot {
            unique_count: unique,
            total_detections: overview.stats.total_detections,
            ad_count: overview.stats.ad_count,
            daily_goal: goal,
            streak: overview.streak,
            remaining,
            progress: unique as f64 / f64::from(goal.max(1)),
            stage: ProgressStage::for_progress(unique, goal),
            coach_message,
            chat_message: coach_chat_message(rng).to_string(),
            celebrate,
            notifications_enabled: overview.notifications_enabled,
        }
    }
}
