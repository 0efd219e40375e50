use std::collections::HashSet;

use anyhow::{bail, Context, Result};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension, ToSql};

use crate::db::{
    helpers::{format_date, parse_optional_date, to_i64, to_u32, to_u64},
    models::{
        DetectionCounters, DetectionState, SeenIdsChange, StreakState, DEFAULT_DAILY_GOAL,
    },
    store::StatsStore,
    Database,
};

pub mod keys {
    pub const UNIQUE_COUNT: &str = "unique_count";
    pub const TOTAL_DETECTIONS: &str = "total_detections";
    pub const AD_COUNT: &str = "ad_count";
    pub const LAST_UPDATE: &str = "last_update";
    pub const LAST_DETECTION_MS: &str = "last_detection_ms";
    pub const LAST_FINGERPRINT: &str = "last_fingerprint";
    pub const DAILY_GOAL: &str = "daily_goal";
    pub const LAST_STREAK_DATE: &str = "last_streak_date";
    pub const CURRENT_STREAK: &str = "current_streak";
    pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
}

fn get_int(conn: &Connection, key: &str) -> Result<Option<i64>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        params![key],
        |row| row.get::<_, i64>(0),
    )
    .optional()
    .with_context(|| format!("failed to read preference {key}"))
}

fn get_text(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM preferences WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .with_context(|| format!("failed to read preference {key}"))
}

fn get_count(conn: &Connection, key: &str) -> Result<u64> {
    get_int(conn, key)?
        .map(|value| to_u64(value, key))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn put_value<V: ToSql>(conn: &Connection, key: &str, value: V) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .with_context(|| format!("failed to write preference {key}"))?;
    Ok(())
}

fn delete_key(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM preferences WHERE key = ?1", params![key])
        .with_context(|| format!("failed to clear preference {key}"))?;
    Ok(())
}

fn load_seen_ids(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT fingerprint FROM seen_ids")?;
    let seen = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()
        .context("failed to read seen_ids")?;
    Ok(seen)
}

impl StatsStore for Database {
    async fn load_detection_state(&self) -> Result<DetectionState> {
        self.execute(|conn| {
            let seen = load_seen_ids(conn)?;
            let mut counters = DetectionCounters {
                unique_count: get_count(conn, keys::UNIQUE_COUNT)?,
                total_detections: get_count(conn, keys::TOTAL_DETECTIONS)?,
                ad_count: get_count(conn, keys::AD_COUNT)?,
                last_fingerprint: get_text(conn, keys::LAST_FINGERPRINT)?,
                last_detection_ms: get_int(conn, keys::LAST_DETECTION_MS)?.unwrap_or(0),
            };

            let seen_len = seen.len() as u64;
            if counters.unique_count != seen_len {
                warn!(
                    "unique_count {} disagrees with {} stored seen ids; using the set",
                    counters.unique_count, seen_len
                );
                counters.unique_count = seen_len;
            }
            if counters.total_detections < counters.unique_count {
                warn!(
                    "total_detections {} below unique_count {}; raising it",
                    counters.total_detections, counters.unique_count
                );
                counters.total_detections = counters.unique_count;
            }

            Ok(DetectionState { counters, seen })
        })
        .await
    }

    async fn save_detection_state(
        &self,
        counters: &DetectionCounters,
        seen: SeenIdsChange,
        written_at_ms: i64,
    ) -> Result<()> {
        let counters = counters.clone();
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open detection transaction")?;

            put_value(&tx, keys::UNIQUE_COUNT, to_i64(counters.unique_count)?)?;
            put_value(&tx, keys::TOTAL_DETECTIONS, to_i64(counters.total_detections)?)?;
            put_value(&tx, keys::AD_COUNT, to_i64(counters.ad_count)?)?;
            put_value(&tx, keys::LAST_DETECTION_MS, counters.last_detection_ms)?;
            put_value(&tx, keys::LAST_UPDATE, written_at_ms)?;
            match &counters.last_fingerprint {
                Some(fingerprint) => put_value(&tx, keys::LAST_FINGERPRINT, fingerprint)?,
                None => delete_key(&tx, keys::LAST_FINGERPRINT)?,
            }

            match seen {
                SeenIdsChange::Unchanged => {}
                SeenIdsChange::Insert(fingerprint) => {
                    tx.execute(
                        "INSERT OR IGNORE INTO seen_ids (fingerprint, first_seen_ms)
                         VALUES (?1, ?2)",
                        params![fingerprint, written_at_ms],
                    )
                    .context("failed to insert seen id")?;
                }
                SeenIdsChange::Clear => {
                    tx.execute("DELETE FROM seen_ids", [])
                        .context("failed to clear seen ids")?;
                }
            }

            tx.commit().context("failed to commit detection state")?;
            Ok(())
        })
        .await
    }

    async fn load_streak_state(&self) -> Result<StreakState> {
        self.execute(|conn| {
            let last_streak_date = parse_optional_date(
                get_text(conn, keys::LAST_STREAK_DATE)?,
                keys::LAST_STREAK_DATE,
            )?;
            let current_streak = get_int(conn, keys::CURRENT_STREAK)?
                .map(|value| to_u32(value, keys::CURRENT_STREAK))
                .transpose()?
                .unwrap_or(0);

            Ok(StreakState {
                last_streak_date,
                current_streak,
            })
        })
        .await
    }

    async fn save_streak_state(&self, state: StreakState) -> Result<()> {
        self.execute(move |conn| {
            let tx = conn
                .transaction()
                .context("failed to open streak transaction")?;
            match state.last_streak_date {
                Some(date) => put_value(&tx, keys::LAST_STREAK_DATE, format_date(date))?,
                None => delete_key(&tx, keys::LAST_STREAK_DATE)?,
            }
            put_value(&tx, keys::CURRENT_STREAK, i64::from(state.current_streak))?;
            tx.commit().context("failed to commit streak state")?;
            Ok(())
        })
        .await
    }

    async fn load_daily_goal(&self) -> Result<u32> {
        self.execute(|conn| {
            let goal = get_int(conn, keys::DAILY_GOAL)?
                .map(|value| to_u32(value, keys::DAILY_GOAL))
                .transpose()?
                .filter(|goal| *goal > 0)
                .unwrap_or(DEFAULT_DAILY_GOAL);
            Ok(goal)
        })
        .await
    }

    async fn save_daily_goal(&self, goal: u32) -> Result<()> {
        if goal == 0 {
            bail!("daily goal must be positive");
        }
        self.execute(move |conn| put_value(conn, keys::DAILY_GOAL, i64::from(goal)))
            .await
    }

    async fn load_notifications_enabled(&self) -> Result<bool> {
        self.execute(|conn| {
            Ok(get_int(conn, keys::NOTIFICATIONS_ENABLED)?.map_or(true, |value| value != 0))
        })
        .await
    }

    async fn save_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.execute(move |conn| {
            put_value(conn, keys::NOTIFICATIONS_ENABLED, i64::from(enabled))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn counters(unique: u64, total: u64, ads: u64) -> DetectionCounters {
        DetectionCounters {
            unique_count: unique,
            total_detections: total,
            ad_count: ads,
            last_fingerprint: Some("reel_maya_0-9L_0C".into()),
            last_detection_ms: 42_000,
        }
    }

    #[tokio::test]
    async fn fresh_database_loads_zeroed_state() {
        let db = Database::open_in_memory().expect("db");
        let state = db.load_detection_state().await.expect("load");
        assert_eq!(state, DetectionState::default());
        assert_eq!(db.load_daily_goal().await.expect("goal"), DEFAULT_DAILY_GOAL);
        assert_eq!(
            db.load_streak_state().await.expect("streak"),
            StreakState::default()
        );
    }

    #[tokio::test]
    async fn detection_state_round_trips_with_seen_changes() {
        let db = Database::open_in_memory().expect("db");
        db.save_detection_state(
            &counters(1, 1, 0),
            SeenIdsChange::Insert("reel_maya_0-9L_0C".into()),
            1_000,
        )
        .await
        .expect("save");
        db.save_detection_state(&counters(1, 2, 3), SeenIdsChange::Unchanged, 2_000)
            .await
            .expect("save");

        let state = db.load_detection_state().await.expect("load");
        assert_eq!(state.counters, counters(1, 2, 3));
        assert!(state.has_seen("reel_maya_0-9L_0C"));

        let last_update = db
            .execute(|conn| get_int(conn, keys::LAST_UPDATE))
            .await
            .expect("last_update");
        assert_eq!(last_update, Some(2_000));

        let cleared = DetectionCounters::default();
        db.save_detection_state(&cleared, SeenIdsChange::Clear, 3_000)
            .await
            .expect("clear");
        let state = db.load_detection_state().await.expect("load");
        assert!(state.seen.is_empty());
        assert_eq!(state.counters, DetectionCounters::default());
    }

    #[tokio::test]
    async fn unique_count_is_reconciled_with_seen_set() {
        let db = Database::open_in_memory().expect("db");
        db.save_detection_state(
            &counters(5, 5, 0),
            SeenIdsChange::Insert("only_one".into()),
            1_000,
        )
        .await
        .expect("save");

        let state = db.load_detection_state().await.expect("load");
        assert_eq!(state.counters.unique_count, 1);
        assert_eq!(state.seen.len(), 1);
    }

    #[tokio::test]
    async fn streak_and_goal_persist() {
        let db = Database::open_in_memory().expect("db");
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).expect("date");
        let streak = StreakState {
            last_streak_date: Some(day),
            current_streak: 4,
        };
        db.save_streak_state(streak).await.expect("save streak");
        assert_eq!(db.load_streak_state().await.expect("load"), streak);

        db.save_daily_goal(25).await.expect("save goal");
        assert_eq!(db.load_daily_goal().await.expect("goal"), 25);
        assert!(db.save_daily_goal(0).await.is_err());
    }

    #[tokio::test]
    async fn notifications_default_on_and_toggle() {
        let db = Database::open_in_memory().expect("db");
        assert!(db.load_notifications_enabled().await.expect("default"));

        db.save_notifications_enabled(false).await.expect("disable");
        assert!(!db.load_notifications_enabled().await.expect("disabled"));

        db.save_notifications_enabled(true).await.expect("enable");
        assert!(db.load_notifications_enabled().await.expect("enabled"));
    }
}
