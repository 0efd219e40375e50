//! Detection counters and the seen-fingerprint set.
//!
//! Invariants: `seen.len() == unique_count` and `unique_count <= total_detections`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionCounters {
    pub unique_count: u64,
    pub total_detections: u64,
    pub ad_count: u64,
    /// Diagnostic only.
    pub last_fingerprint: Option<String>,
    pub last_detection_ms: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionState {
    pub counters: DetectionCounters,
    pub seen: HashSet<String>,
}

impl DetectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_seen(&self, fingerprint: &str) -> bool {
        self.seen.contains(fingerprint)
    }
}

/// How a write changes the persisted seen-id set. The set grows for the lifetime
/// of the install, so it is never rewritten wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeenIdsChange {
    Unchanged,
    Insert(String),
    Clear,
}

/// Outcome of feeding one flattened snapshot to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionOutcome {
    Ignored,
    Ad,
    Debounced,
    Duplicate,
    NewUnique,
}

impl DetectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionOutcome::Ignored => "Ignored",
            DetectionOutcome::Ad => "Ad",
            DetectionOutcome::Debounced => "Debounced",
            DetectionOutcome::Duplicate => "Duplicate",
            DetectionOutcome::NewUnique => "NewUnique",
        }
    }
}
