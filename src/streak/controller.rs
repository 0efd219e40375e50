use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use log::info;

use crate::db::StatsStore;
use crate::detection::DetectionTracker;

use super::evaluator::evaluate;

/// Reads the unique count and goal, evaluates, and writes the streak back while
/// holding the detection lock, so no detection lands between read and write.
pub struct StreakController<S> {
    store: Arc<S>,
}

impl<S> Clone for StreakController<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: StatsStore> StreakController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn evaluate(&self, tracker: &DetectionTracker<S>, today: NaiveDate) -> Result<u32> {
        let yesterday = today
            .pred_opt()
            .ok_or_else(|| anyhow!("no calendar day before {today}"))?;

        let detection = tracker.lock_state().await;
        let unique_count = detection.counters.unique_count;
        let goal = self.store.load_daily_goal().await?;
        let previous = self.store.load_streak_state().await?;

        let update = evaluate(
            today,
            yesterday,
            previous.last_streak_date,
            previous.current_streak,
            unique_count,
            goal,
        );

        if let Some(next) = update.next_state(previous, today) {
            self.store.save_streak_state(next).await?;
            info!(
                "Streak updated: {} -> {} ({unique_count}/{goal})",
                previous.current_streak, next.current_streak
            );
        }
        drop(detection);

        Ok(update.streak())
    }

    pub async fn evaluate_today(&self, tracker: &DetectionTracker<S>) -> Result<u32> {
        self.evaluate(tracker, Local::now().date_naive()).await
    }

    pub async fn daily_goal(&self) -> Result<u32> {
        self.store.load_daily_goal().await
    }

    pub async fn set_daily_goal(&self, tracker: &DetectionTracker<S>, goal: u32) -> Result<()> {
        if goal == 0 {
            bail!("daily goal must be positive");
        }
        let _detection = tracker.lock_state().await;
        self.store.save_daily_goal(goal).await?;
        info!("Daily goal set to {goal}");
        Ok(())
    }
}
