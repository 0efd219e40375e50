use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::counter::ReelCounter;
use crate::db::StatsStore;
use crate::snapshot::SnapshotEvent;

use super::worker::{ingest_loop, IngestSummary};

pub const INGEST_QUEUE_CAPACITY: usize = 64;

/// Owns the background task that turns pushed snapshots into detections.
pub struct IngestController {
    handle: Option<JoinHandle<IngestSummary>>,
    cancel_token: Option<CancellationToken>,
    sender: Option<mpsc::Sender<SnapshotEvent>>,
}

impl Default for IngestController {
    fn default() -> Self {
        Self::new()
    }
}

impl IngestController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            sender: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Spawns the loop and returns the push side of its queue.
    pub fn start<S: StatsStore>(
        &mut self,
        counter: ReelCounter<S>,
    ) -> Result<mpsc::Sender<SnapshotEvent>> {
        if self.handle.is_some() {
            bail!("ingest already active");
        }

        let cancel_token = CancellationToken::new();
        let (tx, rx) = mpsc::channel(INGEST_QUEUE_CAPACITY);
        let handle = tokio::spawn(ingest_loop(counter, rx, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.sender = Some(tx.clone());
        info!("Ingest started");
        Ok(tx)
    }

    pub fn sender(&self) -> Option<mpsc::Sender<SnapshotEvent>> {
        self.sender.clone()
    }

    /// Closes the controller's own sender and waits for queued events to drain.
    /// Returns once every other sender has been dropped too.
    pub async fn finish(&mut self) -> Result<IngestSummary> {
        self.sender = None;
        self.cancel_token = None;
        self.join().await
    }

    /// Stops right away; queued events are discarded.
    pub async fn stop(&mut self) -> Result<IngestSummary> {
        self.sender = None;
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.join().await
    }

    async fn join(&mut self) -> Result<IngestSummary> {
        match self.handle.take() {
            Some(handle) => handle.await.context("ingest loop task failed to join"),
            None => Ok(IngestSummary::default()),
        }
    }
}
