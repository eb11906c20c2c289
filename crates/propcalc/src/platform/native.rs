//! Native persistence: `{data_dir}/scenarios.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use propcalc_core::{PersistedState, Persistence, PersistenceError};

/// File name of the persisted scenario list inside the data directory
pub const SCENARIOS_FILE: &str = "scenarios.json";

/// Synchronous file persistence with atomic replace
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SCENARIOS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl Persistence for FilePersistence {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => PersistedState::from_json(&content).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Io(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        let json = state.to_json()?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                PersistenceError::Io(format!("Failed to create data directory: {}", e))
            })?;
        }

        // Write to a sibling file first so a crash never leaves a torn file
        let temp = self.temp_path();
        fs::write(&temp, json)
            .map_err(|e| PersistenceError::Io(format!("Failed to write {}: {}", temp.display(), e)))?;
        fs::rename(&temp, &self.path).map_err(|e| {
            PersistenceError::Io(format!("Failed to replace {}: {}", self.path.display(), e))
        })
    }
}

/// Request sent to the persistence thread
enum WriteRequest {
    Save(PersistedState),
    /// Reply with the outcome of the latest write once everything queued
    /// before this request has been written
    Flush(Sender<Result<(), PersistenceError>>),
    Shutdown,
}

/// File persistence that writes on a background thread.
///
/// `save` only queues the snapshot. Snapshots queued faster than the disk
/// keeps up are coalesced, so only the latest one is written. A failed write
/// is returned by the next `save` or `flush`. Loads run on the caller's
/// thread. Dropping the worker writes anything still queued.
pub struct BackgroundPersistence {
    file: FilePersistence,
    request_tx: Sender<WriteRequest>,
    last_error: Arc<Mutex<Option<PersistenceError>>>,
    thread: Option<JoinHandle<()>>,
}

impl BackgroundPersistence {
    pub fn new(file: FilePersistence) -> Self {
        let (request_tx, request_rx) = channel();
        let worker_file = file.clone();
        let last_error = Arc::new(Mutex::new(None));
        let worker_error = Arc::clone(&last_error);

        let thread = thread::spawn(move || {
            run_writer(&worker_file, request_rx, &worker_error);
        });

        Self {
            file,
            request_tx,
            last_error,
            thread: Some(thread),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Outcome of the most recent background write
    fn last_write(&self) -> Result<(), PersistenceError> {
        match &*self.last_error.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

fn run_writer(
    file: &FilePersistence,
    request_rx: Receiver<WriteRequest>,
    last_error: &Mutex<Option<PersistenceError>>,
) {
    let mut last_result = Ok(());

    while let Ok(first) = request_rx.recv() {
        let mut latest = None;
        let mut waiters = Vec::new();
        let mut shutdown = false;

        // Drain whatever else is already queued
        let mut next = Some(first);
        while let Some(request) = next {
            match request {
                WriteRequest::Save(state) => latest = Some(state),
                WriteRequest::Flush(reply) => waiters.push(reply),
                WriteRequest::Shutdown => shutdown = true,
            }
            next = request_rx.try_recv().ok();
        }

        if let Some(state) = latest {
            last_result = file.save(&state);
            match &last_result {
                Ok(()) => tracing::debug!(
                    scenarios = state.scenarios.len(),
                    "Wrote scenarios to disk"
                ),
                Err(e) => tracing::warn!(error = %e, "Background scenario write failed"),
            }
            *last_error.lock().unwrap_or_else(PoisonError::into_inner) = last_result.clone().err();
        }

        for reply in waiters {
            let _ = reply.send(last_result.clone());
        }

        if shutdown {
            break;
        }
    }
}

impl Persistence for BackgroundPersistence {
    fn load(&self) -> Result<Option<PersistedState>, PersistenceError> {
        self.file.load()
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistenceError> {
        self.request_tx
            .send(WriteRequest::Save(state.clone()))
            .map_err(|_| PersistenceError::NotAvailable("persistence worker stopped".to_string()))?;
        // The snapshot stays queued as a retry even when the previous write failed
        self.last_write()
    }

    fn flush(&self) -> Result<(), PersistenceError> {
        let (reply_tx, reply_rx) = channel();
        self.request_tx
            .send(WriteRequest::Flush(reply_tx))
            .map_err(|_| PersistenceError::NotAvailable("persistence worker stopped".to_string()))?;
        reply_rx
            .recv()
            .map_err(|_| PersistenceError::NotAvailable("persistence worker stopped".to_string()))?
    }
}

impl Drop for BackgroundPersistence {
    fn drop(&mut self) {
        let _ = self.request_tx.send(WriteRequest::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Persistence worker panicked");
            }
        }
    }
}
