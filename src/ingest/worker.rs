use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::counter::ReelCounter;
use crate::db::{DetectionOutcome, StatsStore};
use crate::snapshot::SnapshotEvent;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Per-outcome tally for one run of the ingest loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    pub ignored: u64,
    pub ads: u64,
    pub debounced: u64,
    pub duplicates: u64,
    pub new_unique: u64,
    pub failed: u64,
}

impl IngestSummary {
    fn record(&mut self, outcome: DetectionOutcome) {
        match outcome {
            DetectionOutcome::Ignored => self.ignored += 1,
            DetectionOutcome::Ad => self.ads += 1,
            DetectionOutcome::Debounced => self.debounced += 1,
            DetectionOutcome::Duplicate => self.duplicates += 1,
            DetectionOutcome::NewUnique => self.new_unique += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.ignored + self.ads + self.debounced + self.duplicates + self.new_unique + self.failed
    }
}

/// Consumes snapshot events one at a time until the channel closes or the token
/// is cancelled. A failed event is logged and dropped.
pub async fn ingest_loop<S: StatsStore>(
    counter: ReelCounter<S>,
    mut events: mpsc::Receiver<SnapshotEvent>,
    cancel_token: CancellationToken,
) -> IngestSummary {
    let mut summary = IngestSummary::default();
    log_info!("ingest loop started");

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log_info!("ingest loop cancelled");
                break;
            }
            event = events.recv() => {
                let Some(event) = event else {
                    log_info!("snapshot source closed");
                    break;
                };

                let started = Instant::now();
                match counter.ingest(&event).await {
                    Ok(outcome) => {
                        summary.record(outcome);
                        log_debug!(
                            "snapshot at {} -> {} in {}ms",
                            event.observed_at_ms,
                            outcome.as_str(),
                            started.elapsed().as_millis()
                        );
                    }
                    Err(err) => {
                        summary.failed += 1;
                        log_error!(
                            "dropping snapshot at {}: {err:?}",
                            event.observed_at_ms
                        );
                    }
                }
            }
        }
    }

    log_info!(
        "ingest loop shutting down after {} events ({} new)",
        summary.total(),
        summary.new_unique
    );
    summary
}
