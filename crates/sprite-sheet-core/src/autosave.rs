use crate::config::AutosaveConfig;
use crate::error::{Result, SpriteSheetError};
use crate::model::RasterBlob;
use crate::session::SessionMetadata;
use crate::store::SessionStore;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What gets written on commit.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub metadata: SessionMetadata,
    pub raster: Option<RasterBlob>,
}

/// Outcome of the most recent commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saved(DateTime<Utc>),
    Failed(String),
}

/// Debounced and immediate saves of a session over one commit path.
///
/// `schedule` restarts a countdown on every call so a burst of edits collapses into
/// one write; `save_now` drops the countdown and writes at once. Only the countdown
/// is cancellable: once a commit starts it runs to completion and reports through
/// `status`. Commits are numbered when triggered, and a commit never overwrites the
/// result of a later one.
/// Both triggers must be used from inside a tokio runtime.
pub struct Autosave {
    inner: Arc<Inner>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    store: Arc<dyn SessionStore>,
    debounce: Duration,
    issued: AtomicU64,
    written: Mutex<u64>,
    status: watch::Sender<SaveStatus>,
}

impl Autosave {
    pub fn new(store: Arc<dyn SessionStore>, cfg: AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                store,
                debounce: cfg.debounce(),
                issued: AtomicU64::new(0),
                written: Mutex::new(0),
                status,
            }),
            pending: Mutex::new(None),
        }
    }

    /// Restarts the countdown with `snapshot` as the state to write.
    pub fn schedule(&self, snapshot: SessionSnapshot) {
        let inner = Arc::clone(&self.inner);
        let generation = inner.next_generation();
        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            // Restarting the countdown aborts this task; the commit runs detached so a
            // write already under way still publishes its outcome.
            let commit = tokio::spawn(inner.commit(generation, snapshot));
            let _ = commit.await;
        });
        if let Some(previous) = self.replace_pending(Some(task)) {
            previous.abort();
            debug!("autosave countdown restarted");
        }
    }

    /// Cancels any countdown and writes `snapshot` right away.
    pub async fn save_now(&self, snapshot: SessionSnapshot) -> Result<()> {
        if let Some(previous) = self.replace_pending(None) {
            previous.abort();
            debug!("autosave countdown cancelled by immediate save");
        }
        let generation = self.inner.next_generation();
        Arc::clone(&self.inner).commit(generation, snapshot).await
    }

    /// True while a countdown is running or its commit has not finished.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|slot| slot.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    pub fn status(&self) -> SaveStatus {
        self.inner.status.borrow().clone()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }

    fn replace_pending(&self, next: Option<JoinHandle<()>>) -> Option<JoinHandle<()>> {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *slot, next)
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        if let Some(task) = self.replace_pending(None) {
            task.abort();
        }
    }
}

impl Inner {
    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn commit(self: Arc<Self>, generation: u64, snapshot: SessionSnapshot) -> Result<()> {
        let inner = Arc::clone(&self);
        let outcome = tokio::task::spawn_blocking(move || inner.write(generation, &snapshot))
            .await
            .map_err(|e| SpriteSheetError::Task(e.to_string()))
            .and_then(|r| r);
        match &outcome {
            Ok(true) => {
                debug!(generation, "session saved");
                self.status.send_replace(SaveStatus::Saved(Utc::now()));
            }
            Ok(false) => debug!(generation, "superseded save skipped"),
            Err(e) => {
                warn!(generation, error = %e, "session save failed");
                self.status.send_replace(SaveStatus::Failed(e.to_string()));
            }
        }
        outcome.map(|_| ())
    }

    /// Writes unless a later commit already did. Returns whether it wrote.
    fn write(&self, generation: u64, snapshot: &SessionSnapshot) -> Result<bool> {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if *written > generation {
            return Ok(false);
        }
        self.store.save(&snapshot.metadata, snapshot.raster.as_ref())?;
        *written = generation;
        Ok(true)
    }
}
