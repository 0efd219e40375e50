//! Counts distinct short-form videos ("reels") from pushed UI-tree snapshots.
//!
//! A snapshot is flattened to text, screened for sponsored content, gated by a
//! debounce window, reduced to a heuristic content fingerprint and deduplicated
//! against every fingerprint seen so far. Counters, the seen set and the goal
//! streak are persisted in SQLite.

pub mod coach;
pub mod counter;
pub mod dashboard;
pub mod db;
pub mod detection;
pub mod ingest;
pub mod settings;
pub mod snapshot;
pub mod streak;
pub mod utils;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;

pub use counter::{Overview, ReelCounter};
pub use dashboard::{Dashboard, DashboardSnapshot};
pub use db::{Database, DetectionOutcome, StatsStore};
pub use detection::DetectionStats;
pub use ingest::{IngestController, IngestSummary};
pub use settings::{DetectorSettings, SettingsStore};
pub use snapshot::{SnapshotEvent, UiNode};

pub const DATABASE_FILE: &str = "reelcounter.sqlite3";
pub const SETTINGS_FILE: &str = "settings.json";

/// Everything a host app keeps alive for the lifetime of the install.
pub struct AppState {
    pub counter: ReelCounter<Database>,
    pub db: Database,
    pub settings: SettingsStore,
}

/// Opens (or creates) the database and settings under `data_dir` and restores
/// the persisted detection state.
pub async fn open(data_dir: &Path) -> Result<AppState> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    let database = Database::new(data_dir.join(DATABASE_FILE))?;
    let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?;
    let counter = ReelCounter::with_store(Arc::new(database.clone()), &settings.detector())
        .await
        .context("failed to restore detection state")?;

    let stats = counter.stats().await;
    info!(
        "Reel counter ready: {} unique, {} total, {} ads",
        stats.unique_count, stats.total_detections, stats.ad_count
    );

    Ok(AppState {
        counter,
        db: database,
        settings,
    })
}
