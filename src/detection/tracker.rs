use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use crate::db::{DetectionCounters, DetectionOutcome, DetectionState, SeenIdsChange, StatsStore};

use super::{
    ads,
    debounce::{DebounceGate, ReelMarker},
    fingerprint::extract_fingerprint,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Counter snapshot handed to readers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionStats {
    pub unique_count: u64,
    pub total_detections: u64,
    pub ad_count: u64,
    pub last_detection_ms: i64,
}

impl From<&DetectionCounters> for DetectionStats {
    fn from(counters: &DetectionCounters) -> Self {
        Self {
            unique_count: counters.unique_count,
            total_detections: counters.total_detections,
            ad_count: counters.ad_count,
            last_detection_ms: counters.last_detection_ms,
        }
    }
}

/// Single owner of the detection state. Every `process`/`reset` runs its full
/// read-modify-persist sequence under one lock, and the in-memory state only
/// changes after the store accepted the write.
pub struct DetectionTracker<S> {
    store: Arc<S>,
    state: Mutex<DetectionState>,
    gate: DebounceGate,
    marker: ReelMarker,
}

impl<S: StatsStore> DetectionTracker<S> {
    pub async fn load(store: Arc<S>, gate: DebounceGate, marker: ReelMarker) -> Result<Self> {
        let state = store.load_detection_state().await?;
        log_info!(
            "Detection state loaded: {} unique, {} total, {} ads",
            state.counters.unique_count,
            state.counters.total_detections,
            state.counters.ad_count
        );

        Ok(Self {
            store,
            state: Mutex::new(state),
            gate,
            marker,
        })
    }

    pub async fn process(&self, flattened: &str, now_ms: i64) -> Result<DetectionOutcome> {
        let mut state = self.state.lock().await;

        if let Some(signal) = ads::classify(flattened) {
            let mut next = state.counters.clone();
            next.ad_count += 1;
            self.store
                .save_detection_state(&next, SeenIdsChange::Unchanged, now_ms)
                .await?;
            state.counters = next;
            log_info!(
                "Ad skipped ({:?}). Total ads: {}",
                signal,
                state.counters.ad_count
            );
            return Ok(DetectionOutcome::Ad);
        }

        if !self.marker.is_present(flattened) {
            return Ok(DetectionOutcome::Ignored);
        }

        let fingerprint = extract_fingerprint(flattened);
        if fingerprint.is_empty() {
            return Ok(DetectionOutcome::Ignored);
        }

        if !self
            .gate
            .should_process(now_ms, state.counters.last_detection_ms)
        {
            log_debug!("Debounced. ID: {}", fingerprint);
            return Ok(DetectionOutcome::Debounced);
        }

        let fingerprint = fingerprint.into_string();
        let is_new = !state.has_seen(&fingerprint);

        let mut next = state.counters.clone();
        next.last_fingerprint = Some(fingerprint.clone());
        next.last_detection_ms = now_ms;
        next.total_detections += 1;

        let seen_change = if is_new {
            next.unique_count += 1;
            SeenIdsChange::Insert(fingerprint.clone())
        } else {
            SeenIdsChange::Unchanged
        };

        self.store
            .save_detection_state(&next, seen_change, now_ms)
            .await?;
        state.counters = next;

        if !is_new {
            log_debug!("Seen before. ID: {}", fingerprint);
            return Ok(DetectionOutcome::Duplicate);
        }

        state.seen.insert(fingerprint.clone());
        let unique = state.counters.unique_count;
        log_info!(
            "New reel! Unique: {} | Total: {} | ID: {}",
            unique,
            state.counters.total_detections,
            fingerprint
        );
        if unique % 50 == 0 {
            log_info!("Milestone: {} reels", unique);
        } else if unique % 10 == 0 {
            log_info!("{} reels consumed", unique);
        }

        Ok(DetectionOutcome::NewUnique)
    }

    /// Irreversibly wipes every counter and the seen set.
    pub async fn reset(&self, now_ms: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        let cleared = DetectionCounters::default();
        self.store
            .save_detection_state(&cleared, SeenIdsChange::Clear, now_ms)
            .await?;
        *state = DetectionState::new();
        log_info!("History wiped");
        Ok(())
    }

    pub async fn stats(&self) -> DetectionStats {
        let state = self.state.lock().await;
        DetectionStats::from(&state.counters)
    }

    pub async fn last_fingerprint(&self) -> Option<String> {
        self.state.lock().await.counters.last_fingerprint.clone()
    }

    /// Holds off detection processing for as long as the guard lives.
    pub(crate) async fn lock_state(&self) -> MutexGuard<'_, DetectionState> {
        self.state.lock().await
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
