//! Translation request lifecycle.
//!
//! ```text
//! trigger ──empty input──> (no-op)
//!    │
//!    ├──source == target──> echo input + LanguagesIdentical
//!    │
//!    └──new RequestId──┬──> Translator::translate ──ok──> translated text
//!                      │                          └─err──> ModelDownloading, needs retry
//!                      │
//!                      └──> availability poll ──installed + needs retry──> translate again
//!                                             └─unsupported──> PairUnsupported
//! ```
//!
//! Every asynchronous completion re-checks, under the state lock, that its
//! request is still the current one before touching the UI state.

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use minitranslator_languages::{detect_pair, LanguagePair};
use tokio::runtime::Handle;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use super::{RequestId, StatusMessage, TranslationRequest, UiState};
use crate::availability::events::ModelAvailabilityChanged;
use crate::availability::{
    AvailabilityPoller, AvailabilityTracker, PairAvailability, PollEffect, PollExit, PollStep,
};
use crate::clients::{AvailabilityProbe, ProbeStatus, TranslationError, Translator};
use crate::config::{self, Config, TranslatorConfig};

const EVENT_CHANNEL_CAPACITY: usize = 32;

struct ActiveRequest {
    request: TranslationRequest,
    /// Stops the request's availability poll once superseded
    cancel: CancellationToken,
    /// This request's own poll reported the pair unsupported
    unsupported_seen: bool,
}

struct ControllerState {
    input: String,
    pair: LanguagePair,
    auto_detect: bool,
    last_request_id: RequestId,
    active: Option<ActiveRequest>,
    needs_retry: bool,
    translated_text: String,
    status: Option<StatusMessage>,
    is_downloading_model: bool,
}

impl ControllerState {
    fn new(translator_config: &TranslatorConfig) -> Self {
        Self {
            input: String::new(),
            pair: translator_config.pair(),
            auto_detect: translator_config.auto_detect_source,
            last_request_id: RequestId::default(),
            active: None,
            needs_retry: false,
            translated_text: String::new(),
            status: None,
            is_downloading_model: false,
        }
    }

    fn is_current(&self, id: RequestId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.request.id == id)
    }

    fn unsupported_seen(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.unsupported_seen)
    }

    /// Drop the active request (its late results become inert) and cancel
    /// its poll.
    fn release_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }

    /// Allocate the next request id, superseding the active request
    fn supersede(&mut self) -> RequestId {
        self.release_active();
        self.last_request_id = self.last_request_id.next();
        self.last_request_id
    }

    fn clear_result(&mut self) {
        self.translated_text.clear();
        self.status = None;
        self.needs_retry = false;
        self.is_downloading_model = false;
    }

    fn ui_state(&self) -> UiState {
        UiState {
            input_text: self.input.clone(),
            translated_text: self.translated_text.clone(),
            error_message: self.status,
            is_downloading_model: self.is_downloading_model,
            request_id: self.last_request_id.value(),
            pair: self.pair,
        }
    }

    fn translator_config(&self) -> TranslatorConfig {
        TranslatorConfig {
            source_language: self.pair.source,
            target_language: self.pair.target,
            auto_detect_source: self.auto_detect,
        }
    }
}

struct Inner {
    translator: Arc<dyn Translator>,
    poller: AvailabilityPoller,
    tracker: AvailabilityTracker,
    config: Config,
    state: Mutex<ControllerState>,
    ui_tx: watch::Sender<UiState>,
    events_tx: broadcast::Sender<ModelAvailabilityChanged>,
    shutdown: CancellationToken,
    /// Runtime request tasks are spawned on; `None` falls back to the
    /// caller's runtime
    runtime: Option<Handle>,
}

/// Single source of truth for the translator popover.
///
/// Cheap to clone; clones share the same state. Intents (`set_input`,
/// `trigger_translation`, ...) may be called from any thread. Request tasks
/// run on the runtime the controller was created in (or was given through
/// [`with_runtime`](Self::with_runtime)).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<Inner>,
}

impl Controller {
    /// Create a controller, restoring the language selection from `config`.
    ///
    /// Captures the current Tokio runtime, if any.
    pub fn new(
        translator: Arc<dyn Translator>,
        probe: Arc<dyn AvailabilityProbe>,
        config: Config,
    ) -> Self {
        Self::build(translator, probe, config, Handle::try_current().ok())
    }

    /// Create a controller whose request tasks run on `runtime`.
    pub fn with_runtime(
        runtime: Handle,
        translator: Arc<dyn Translator>,
        probe: Arc<dyn AvailabilityProbe>,
        config: Config,
    ) -> Self {
        Self::build(translator, probe, config, Some(runtime))
    }

    fn build(
        translator: Arc<dyn Translator>,
        probe: Arc<dyn AvailabilityProbe>,
        config: Config,
        runtime: Option<Handle>,
    ) -> Self {
        let translator_config = config::load_translator_config(&config);
        info!(
            "Language selection: {} (auto-detect: {})",
            translator_config.pair(),
            translator_config.auto_detect_source
        );

        let state = ControllerState::new(&translator_config);
        let (ui_tx, _) = watch::channel(state.ui_state());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let tracker = AvailabilityTracker::new(Arc::new(config.clone()));

        Self {
            inner: Arc::new(Inner {
                translator,
                poller: AvailabilityPoller::new(probe),
                tracker,
                config,
                state: Mutex::new(state),
                ui_tx,
                events_tx,
                shutdown: CancellationToken::new(),
                runtime,
            }),
        }
    }

    // ========== Read side ==========

    /// Current UI state
    pub fn snapshot(&self) -> UiState {
        self.inner.ui_tx.borrow().clone()
    }

    /// Receiver that sees every published UI state
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.inner.ui_tx.subscribe()
    }

    /// Receiver for availability notices emitted after this call
    pub fn subscribe_events(&self) -> broadcast::Receiver<ModelAvailabilityChanged> {
        self.inner.events_tx.subscribe()
    }

    pub fn language_pair(&self) -> LanguagePair {
        self.inner.lock_state().pair
    }

    pub fn is_auto_detect_enabled(&self) -> bool {
        self.inner.lock_state().auto_detect
    }

    /// Last known availability of `pair` in this process
    pub fn availability(&self, pair: LanguagePair) -> PairAvailability {
        self.inner.tracker.state(pair)
    }

    // ========== Intents ==========

    /// Replace the input text.
    ///
    /// With auto-detection on, the source language follows the detected
    /// language of the text.
    pub fn set_input(&self, text: impl Into<String>) {
        let mut state = self.inner.lock_state();
        state.input = text.into();

        if state.auto_detect {
            if let Some(detected) = detect_pair(&state.input, state.pair) {
                info!("Detected source language, switching {} to {}", state.pair, detected);
                state.pair = detected;
                self.inner.save_config(&state);
            }
        }

        self.inner.publish(&state);
    }

    /// Change the selection. Does not translate.
    pub fn set_language_pair(&self, pair: LanguagePair) {
        let mut state = self.inner.lock_state();
        self.inner.select_pair(&mut state, pair);
    }

    /// Change the selection from catalog identifiers (as sent by the UI).
    pub fn select_languages(&self, source: &str, target: &str) -> crate::Result<()> {
        let pair = LanguagePair::parse(source, target)?;
        self.set_language_pair(pair);
        Ok(())
    }

    /// Exchange source and target. Does not translate.
    pub fn swap_languages(&self) {
        let mut state = self.inner.lock_state();
        let swapped = state.pair.swapped();
        self.inner.select_pair(&mut state, swapped);
    }

    pub fn set_auto_detect(&self, enabled: bool) {
        let mut state = self.inner.lock_state();
        if state.auto_detect == enabled {
            return;
        }
        state.auto_detect = enabled;
        self.inner.save_config(&state);
    }

    /// Translate the current input with the current selection.
    ///
    /// Returns the id allocated for this attempt, or `None` when nothing
    /// happened: the input is empty (the previous result stays), or no Tokio
    /// runtime is available to run the translation on.
    pub fn trigger_translation(&self) -> Option<RequestId> {
        let (request, cancel, runtime) = {
            let mut state = self.inner.lock_state();

            if state.input.is_empty() {
                debug!("Ignoring translation trigger with empty input");
                return None;
            }

            if state.pair.is_identical() {
                let id = state.supersede();
                debug!("Request {}: identical languages ({}), echoing input", id, state.pair);
                state.clear_result();
                state.translated_text = state.input.clone();
                state.status = Some(StatusMessage::LanguagesIdentical);
                self.inner.publish(&state);
                return Some(id);
            }

            let Some(runtime) = self.inner.runtime() else {
                error!("No Tokio runtime available, translation not started");
                return None;
            };

            let id = state.supersede();

            let request = TranslationRequest {
                id,
                pair: state.pair,
                input: state.input.clone(),
            };
            let cancel = self.inner.shutdown.child_token();
            state.active = Some(ActiveRequest {
                request: request.clone(),
                cancel: cancel.clone(),
                unsupported_seen: false,
            });
            state.clear_result();
            self.inner.publish(&state);

            (request, cancel, runtime)
        };

        info!(
            "Request {}: translating {} characters ({})",
            request.id,
            request.input.chars().count(),
            request.pair
        );

        let id = request.id;
        let inner = Arc::clone(&self.inner);
        runtime.spawn(async move {
            inner.run_request(request, cancel).await;
        });

        Some(id)
    }

    /// Clear input and result. Work still in flight for the current request
    /// becomes inert. Availability knowledge is kept.
    pub fn reset(&self) {
        let mut state = self.inner.lock_state();
        state.release_active();
        state.input.clear();
        state.clear_result();
        self.inner.publish(&state);
        debug!("Translator state reset");
    }

    /// Stop every running availability poll. Used when the app quits.
    pub fn shutdown(&self) {
        info!("Shutting down translation controller");
        self.inner.shutdown.cancel();
        self.inner.lock_state().release_active();
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, id: RequestId) -> bool {
        self.lock_state().is_current(id)
    }

    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }

    fn publish(&self, state: &ControllerState) {
        self.ui_tx.send_replace(state.ui_state());
    }

    fn emit(&self, event: ModelAvailabilityChanged) {
        if self.events_tx.send(event).is_err() {
            debug!("No listeners for availability notice");
        }
    }

    fn select_pair(&self, state: &mut ControllerState, pair: LanguagePair) {
        if state.pair == pair {
            return;
        }
        debug!("Language selection changed: {} -> {}", state.pair, pair);
        state.pair = pair;
        self.save_config(state);
        self.publish(state);
    }

    fn save_config(&self, state: &ControllerState) {
        if let Err(e) = config::save_translator_config(&self.config, &state.translator_config()) {
            error!("Failed to save translator config: {}", e);
        }
    }

    /// Run the translate call and the availability poll side by side
    async fn run_request(&self, request: TranslationRequest, cancel: CancellationToken) {
        futures_util::future::join(
            self.run_translation(&request),
            self.run_availability(&request, &cancel),
        )
        .await;
    }

    async fn run_translation(&self, request: &TranslationRequest) {
        let result = self
            .translator
            .translate(&request.input, request.pair)
            .await;
        self.apply_translation(request, result);
    }

    async fn run_availability(&self, request: &TranslationRequest, cancel: &CancellationToken) {
        let exit = self
            .poller
            .run(request.pair, cancel, |observed| {
                self.apply_observation(request, observed)
            })
            .await;

        match exit {
            PollExit::Finished { retry: true } => {
                if !self.is_current(request.id) {
                    debug!("Request {}: superseded before retry", request.id);
                    return;
                }
                info!(
                    "Request {}: model for {} installed, retrying translation",
                    request.id, request.pair
                );
                self.translator.invalidate(request.pair);
                self.run_translation(request).await;
            }
            PollExit::Finished { retry: false } => {}
            PollExit::Superseded | PollExit::Cancelled => {
                debug!("Request {}: availability poll ended ({:?})", request.id, exit);
            }
        }
    }

    /// Apply a translator outcome if `request` is still current
    fn apply_translation(
        &self,
        request: &TranslationRequest,
        result: Result<String, TranslationError>,
    ) {
        let mut state = self.lock_state();

        if !state.is_current(request.id) {
            debug!("Request {}: discarding stale translation result", request.id);
            return;
        }

        match result {
            Ok(text) => {
                debug!("Request {}: translation succeeded", request.id);
                state.translated_text = text;
                state.status = None;
                state.needs_retry = false;
                state.is_downloading_model = false;
            }
            Err(e) => {
                warn!("Request {}: translation failed: {}", request.id, e);
                if state.unsupported_seen() {
                    state.status = Some(StatusMessage::PairUnsupported);
                    state.needs_retry = false;
                } else {
                    state.status = Some(StatusMessage::ModelDownloading);
                    state.needs_retry = true;
                }
            }
        }

        self.publish(&state);
    }

    /// Feed one probe observation through the availability state machine and
    /// apply its effects if `request` is still current.
    fn apply_observation(
        &self,
        request: &TranslationRequest,
        observed: Option<ProbeStatus>,
    ) -> ControlFlow<PollExit> {
        let pair = request.pair;
        let mut state = self.lock_state();

        if !state.is_current(request.id) {
            if let Some(status) = observed {
                self.tracker.record(pair, status);
            }
            return ControlFlow::Break(PollExit::Superseded);
        }

        let transition = self.tracker.evaluate(pair, observed, state.needs_retry);
        self.tracker.commit(pair, &transition);

        let mut retry = false;
        for effect in &transition.effects {
            match effect {
                PollEffect::ShowDownloading => state.is_downloading_model = true,
                PollEffect::HideDownloading => state.is_downloading_model = false,
                PollEffect::NotifyDownloadInProgress => {
                    info!("Model for {} is downloading", pair);
                    self.emit(ModelAvailabilityChanged::DownloadInProgress { pair });
                }
                PollEffect::NotifyDownloadComplete => {
                    info!("Model for {} is installed", pair);
                    self.emit(ModelAvailabilityChanged::DownloadComplete { pair });
                }
                PollEffect::ReportUnsupported => {
                    warn!("Language pair {} is not supported", pair);
                    state.status = Some(StatusMessage::PairUnsupported);
                    state.needs_retry = false;
                    if let Some(active) = state.active.as_mut() {
                        active.unsupported_seen = true;
                    }
                    self.emit(ModelAvailabilityChanged::PairUnsupported { pair });
                }
                PollEffect::RetryTranslation => retry = true,
            }
        }

        self.publish(&state);
        drop(state);

        if let Err(e) = self.tracker.persist(pair, &transition) {
            error!("Failed to persist download-complete flag for {}: {}", pair, e);
        }

        match transition.step {
            PollStep::Continue => ControlFlow::Continue(()),
            PollStep::Stop => ControlFlow::Break(PollExit::Finished { retry }),
        }
    }
}
