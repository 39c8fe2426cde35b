use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gloss_core::config::{ConfigSource, TranslatorConfig};
use gloss_core::dispatch::{
    ChatChoice, ChatEndpoint, ChatMessageBody, ChatRequest, ChatResponse, DispatchError,
    Dispatcher,
};
use gloss_core::model::TranslationOutcome;
use gloss_core::session::{
    OutputTarget, SurfaceRegistry, TranslationSession, MSG_CONFIG_UNAVAILABLE,
};

/// Output target that records every delivered outcome.
#[derive(Default)]
struct RecordingTarget {
    outcomes: Mutex<Vec<TranslationOutcome>>,
}

impl RecordingTarget {
    fn outcomes(&self) -> Vec<TranslationOutcome> {
        self.outcomes.lock().unwrap().clone()
    }
}

impl OutputTarget for RecordingTarget {
    fn deliver(&self, outcome: TranslationOutcome) {
        self.outcomes.lock().unwrap().push(outcome);
    }
}

/// Endpoint that sleeps before replying with its call index, so tests can
/// overlap a second request with the first.
struct SlowEcho {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowEcho {
    fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay, calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatEndpoint for SlowEcho {
    async fn complete(
        &self,
        _request: &ChatRequest,
        _api_key: &str,
    ) -> Result<ChatResponse, DispatchError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        Ok(ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessageBody { content: format!("reply-{n}") },
            }],
        })
    }
}

fn shared_config(api_key: &str) -> Arc<dyn ConfigSource> {
    Arc::new(Mutex::new(TranslatorConfig {
        api_key: api_key.to_string(),
        ..TranslatorConfig::default()
    }))
}

#[test]
fn replacing_in_flight_request_leaves_one_worker_and_drops_stale_result() {
    let endpoint = SlowEcho::new(Duration::from_millis(50));
    let dispatcher = Arc::new(Dispatcher::with_endpoint(endpoint.clone()));
    let config = shared_config("key");
    let target = Arc::new(RecordingTarget::default());

    let mut session =
        TranslationSession::new(dispatcher, Arc::downgrade(&config), target.clone());
    session.set_pseudocode("void sub_500(void) {}");
    session.set_pseudocode("void sub_600(void) {}");
    assert!(session.has_live_worker());
    session.join_worker();

    // Both requests reached the endpoint, but only the second one's result
    // may reach the target.
    assert_eq!(endpoint.calls(), 2);
    assert_eq!(
        target.outcomes(),
        vec![TranslationOutcome::Translated("reply-2".to_string())]
    );
}

#[test]
fn missing_api_key_is_reported_without_spawning_a_worker() {
    let endpoint = SlowEcho::new(Duration::ZERO);
    let dispatcher = Arc::new(Dispatcher::with_endpoint(endpoint.clone()));
    let config = shared_config("");
    let target = Arc::new(RecordingTarget::default());

    let mut session =
        TranslationSession::new(dispatcher, Arc::downgrade(&config), target.clone());
    session.set_pseudocode("void sub_500(void) {}");

    assert!(!session.has_live_worker());
    assert_eq!(endpoint.calls(), 0);
    assert_eq!(
        target.outcomes(),
        vec![TranslationOutcome::Failed("API key is required".to_string())]
    );
}

#[test]
fn dropped_config_source_yields_instructive_message() {
    let endpoint = SlowEcho::new(Duration::ZERO);
    let dispatcher = Arc::new(Dispatcher::with_endpoint(endpoint));
    let target = Arc::new(RecordingTarget::default());

    let config = shared_config("key");
    let weak_config = Arc::downgrade(&config);
    drop(config);

    let mut session = TranslationSession::new(dispatcher, weak_config, target.clone());
    session.set_pseudocode("void sub_500(void) {}");

    assert_eq!(
        target.outcomes(),
        vec![TranslationOutcome::Failed(MSG_CONFIG_UNAVAILABLE.to_string())]
    );
}

#[test]
fn closing_a_session_suppresses_the_late_result() {
    let endpoint = SlowEcho::new(Duration::from_millis(50));
    let dispatcher = Arc::new(Dispatcher::with_endpoint(endpoint.clone()));
    let config = shared_config("key");
    let target = Arc::new(RecordingTarget::default());

    let mut session =
        TranslationSession::new(dispatcher, Arc::downgrade(&config), target.clone());
    session.set_pseudocode("void sub_500(void) {}");
    session.close();

    assert_eq!(endpoint.calls(), 1);
    assert!(target.outcomes().is_empty(), "no outcome may reach a closed surface");
}

#[test]
fn registry_tracks_open_and_close_lifecycle() {
    let endpoint = SlowEcho::new(Duration::ZERO);
    let dispatcher = Arc::new(Dispatcher::with_endpoint(endpoint));
    let config = shared_config("key");

    let mut registry = SurfaceRegistry::new();
    let a = registry.open(
        dispatcher.clone(),
        Arc::downgrade(&config),
        Arc::new(RecordingTarget::default()),
    );
    let b = registry.open(
        dispatcher,
        Arc::downgrade(&config),
        Arc::new(RecordingTarget::default()),
    );
    assert_ne!(a, b);
    assert_eq!(registry.len(), 2);
    assert!(registry.get_mut(a).is_some());

    assert!(registry.close(a));
    assert!(!registry.close(a), "closing twice reports unknown id");
    assert_eq!(registry.len(), 1);
    assert!(registry.close(b));
    assert!(registry.is_empty());
}
