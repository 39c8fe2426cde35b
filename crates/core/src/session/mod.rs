//! Per-surface translation sessions.
//!
//! Each open surface owns one [`TranslationSession`]: a single-outstanding-
//! request worker plus the output target results are delivered to. Starting a
//! new request cancels and joins any previous in-flight worker; a stale
//! worker's late result never reaches the current target. The
//! [`SurfaceRegistry`] gives the top-level controller an explicit open/close
//! lifecycle keyed by opaque handles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use crate::config::ConfigSource;
use crate::dispatch::Dispatcher;
use crate::model::{TranslationOutcome, TranslationRequest};

/// Shown when the configuration surface has gone away between open and
/// dispatch. Instructive rather than diagnostic: the user can recover.
pub const MSG_CONFIG_UNAVAILABLE: &str =
    "Configuration is not available. Reopen the settings surface and try again";

/// Sink for the single outcome of a request. Implementations must tolerate
/// being called from a worker thread.
pub trait OutputTarget: Send + Sync {
    fn deliver(&self, outcome: TranslationOutcome);
}

/// One surface's translation state: at most one live worker at a time.
pub struct TranslationSession {
    dispatcher: Arc<Dispatcher>,
    config: Weak<dyn ConfigSource>,
    output: Arc<dyn OutputTarget>,
    generation: Arc<AtomicU64>,
    worker: Option<thread::JoinHandle<()>>,
}

impl TranslationSession {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        config: Weak<dyn ConfigSource>,
        output: Arc<dyn OutputTarget>,
    ) -> Self {
        Self {
            dispatcher,
            config,
            output,
            generation: Arc::new(AtomicU64::new(0)),
            worker: None,
        }
    }

    /// Start translating `code`, replacing any request still in flight.
    ///
    /// The previous worker is invalidated (its result will be dropped) and
    /// joined before the new one starts. Validation failures are delivered
    /// immediately without spawning a worker or touching the network.
    pub fn set_pseudocode(&mut self, code: &str) {
        // Bumping the generation first means a previous worker that finishes
        // during the join below cannot deliver to this request's target.
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.join_worker();

        let Some(config) = self.config.upgrade() else {
            self.output.deliver(TranslationOutcome::Failed(MSG_CONFIG_UNAVAILABLE.to_string()));
            return;
        };
        let snapshot = config.snapshot();
        if snapshot.api_key.is_empty() {
            self.output.deliver(TranslationOutcome::Failed("API key is required".to_string()));
            return;
        }

        let request = TranslationRequest {
            model: snapshot.model,
            pseudocode: code.to_string(),
            target_language: snapshot.target_language,
            api_key: snapshot.api_key,
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        let output = Arc::downgrade(&self.output);
        let generation = Arc::clone(&self.generation);

        // One dedicated worker per request. It owns its own current-thread
        // runtime, which is torn down when the thread ends regardless of
        // whether the dispatch succeeded.
        let handle = thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => match runtime.block_on(dispatcher.translate(&request)) {
                    Ok(text) => TranslationOutcome::Translated(text),
                    Err(e) => TranslationOutcome::Failed(e.to_string()),
                },
                Err(e) => {
                    TranslationOutcome::Failed(format!("Error processing request: {e}"))
                }
            };

            if generation.load(Ordering::SeqCst) != my_generation {
                log::debug!("dropping stale translation result");
                return;
            }
            match output.upgrade() {
                Some(target) => target.deliver(outcome),
                None => log::debug!("output target torn down; dropping result"),
            }
        });
        self.worker = Some(handle);
    }

    /// True while a worker thread exists for the most recent request.
    pub fn has_live_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Wait for the current worker (if any) to finish and discard it.
    pub fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// Invalidate any in-flight request and wait for its worker. After this
    /// no outcome from earlier requests can reach the output target.
    pub fn close(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.join_worker();
    }
}

impl Drop for TranslationSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Opaque handle for an open surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

/// Registry of open surfaces, owned by the top-level controller.
///
/// Surfaces are added on open and removed on close; closing a surface joins
/// its worker so no result can outlive it.
#[derive(Default)]
pub struct SurfaceRegistry {
    sessions: HashMap<SurfaceId, TranslationSession>,
    next_id: u64,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &mut self,
        dispatcher: Arc<Dispatcher>,
        config: Weak<dyn ConfigSource>,
        output: Arc<dyn OutputTarget>,
    ) -> SurfaceId {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);
        self.sessions.insert(id, TranslationSession::new(dispatcher, config, output));
        id
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut TranslationSession> {
        self.sessions.get_mut(&id)
    }

    /// Close a surface, joining its worker. Returns false for unknown ids.
    pub fn close(&mut self, id: SurfaceId) -> bool {
        match self.sessions.remove(&id) {
            Some(mut session) => {
                session.close();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
