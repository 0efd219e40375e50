use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    db::{DetectionOutcome, StatsStore},
    detection::{DetectionStats, DetectionTracker},
    settings::DetectorSettings,
    snapshot::{flatten, SnapshotEvent},
    streak::StreakController,
};

/// Everything the dashboard needs from the core, read in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub stats: DetectionStats,
    pub daily_goal: u32,
    pub streak: u32,
    pub notifications_enabled: bool,
}

/// Snapshot pipeline entry point: flatten, classify, debounce, fingerprint, count.
pub struct ReelCounter<S> {
    tracker: Arc<DetectionTracker<S>>,
    streaks: StreakController<S>,
}

impl<S> Clone for ReelCounter<S> {
    fn clone(&self) -> Self {
        Self {
            tracker: Arc::clone(&self.tracker),
            streaks: self.streaks.clone(),
        }
    }
}

impl<S: StatsStore> ReelCounter<S> {
    pub async fn with_store(store: Arc<S>, settings: &DetectorSettings) -> Result<Self> {
        settings.validate().context("invalid detector settings")?;
        let tracker = DetectionTracker::load(
            Arc::clone(&store),
            settings.debounce_gate(),
            settings.reel_marker(),
        )
        .await?;

        Ok(Self {
            tracker: Arc::new(tracker),
            streaks: StreakController::new(store),
        })
    }

    pub async fn ingest(&self, event: &SnapshotEvent) -> Result<DetectionOutcome> {
        let flattened = flatten(event.root.as_ref());
        self.process_text(&flattened, event.observed_at_ms).await
    }

    pub async fn process_text(&self, flattened: &str, now_ms: i64) -> Result<DetectionOutcome> {
        self.tracker.process(flattened, now_ms).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.tracker.reset(Utc::now().timestamp_millis()).await
    }

    pub async fn stats(&self) -> DetectionStats {
        self.tracker.stats().await
    }

    pub async fn daily_goal(&self) -> Result<u32> {
        self.streaks.daily_goal().await
    }

    pub async fn set_daily_goal(&self, goal: u32) -> Result<()> {
        self.streaks.set_daily_goal(&self.tracker, goal).await
    }

    pub async fn evaluate_streak(&self, today: NaiveDate) -> Result<u32> {
        self.streaks.evaluate(&self.tracker, today).await
    }

    pub async fn overview(&self, today: NaiveDate) -> Result<Overview> {
        let streak = self.evaluate_streak(today).await?;
        Ok(Overview {
            stats: self.stats().await,
            daily_goal: self.daily_goal().await?,
            streak,
            notifications_enabled: self.notifications_enabled().await?,
        })
    }

    pub async fn overview_today(&self) -> Result<Overview> {
        self.overview(Local::now().date_naive()).await
    }

    /// Whether reminder notifications should be scheduled.
    pub async fn notifications_enabled(&self) -> Result<bool> {
        self.tracker.store().load_notifications_enabled().await
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.tracker
            .store()
            .save_notifications_enabled(enabled)
            .await?;
        log::info!(
            "Reminder notifications {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::snapshot::UiNode;

    async fn counter() -> ReelCounter<Database> {
        let db = Arc::new(Database::open_in_memory().expect("db"));
        ReelCounter::with_store(db, &DetectorSettings::default())
            .await
            .expect("counter")
    }

    fn reel_tree(user: &str, likes: &str) -> UiNode {
        UiNode::new().with_text("Reels").with_children([
            UiNode::new().with_text(format!("@{user}")),
            UiNode::new().with_description(format!("Like number is {likes}")),
            UiNode::new().with_text("golden hour at the pier"),
        ])
    }

    #[tokio::test]
    async fn ingest_flattens_then_counts() {
        let counter = counter().await;
        let first = SnapshotEvent::new(Some(reel_tree("maya", "12")), 10_000);
        let rerender = SnapshotEvent::new(Some(reel_tree("maya", "15")), 11_000);
        let later = SnapshotEvent::new(Some(reel_tree("maya", "18")), 14_500);

        assert_eq!(counter.ingest(&first).await.expect("first"), DetectionOutcome::NewUnique);
        assert_eq!(counter.ingest(&rerender).await.expect("rerender"), DetectionOutcome::Debounced);
        assert_eq!(counter.ingest(&later).await.expect("later"), DetectionOutcome::Duplicate);
    }

    #[tokio::test]
    async fn absent_root_is_ignored() {
        let counter = counter().await;
        let outcome = counter
            .ingest(&SnapshotEvent::new(None, 10_000))
            .await
            .expect("ingest");
        assert_eq!(outcome, DetectionOutcome::Ignored);
    }

    #[tokio::test]
    async fn overview_reports_goal_and_streak() {
        let counter = counter().await;
        counter.set_daily_goal(1).await.expect("goal");
        counter
            .ingest(&SnapshotEvent::new(Some(reel_tree("maya", "12")), 10_000))
            .await
            .expect("ingest");

        let today = NaiveDate::from_ymd_opt(2024, 7, 4).expect("date");
        let overview = counter.overview(today).await.expect("overview");
        assert_eq!(overview.daily_goal, 1);
        assert_eq!(overview.streak, 1);
        assert_eq!(overview.stats.unique_count, 1);
        assert!(overview.notifications_enabled);
    }

    #[tokio::test]
    async fn notification_toggle_shows_in_overview() {
        let counter = counter().await;
        counter
            .set_notifications_enabled(false)
            .await
            .expect("disable");
        assert!(!counter.notifications_enabled().await.expect("read"));

        let today = NaiveDate::from_ymd_opt(2024, 7, 4).expect("date");
        let overview = counter.overview(today).await.expect("overview");
        assert!(!overview.notifications_enabled);
    }
}
