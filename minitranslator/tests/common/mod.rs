//! Scripted collaborators for driving the controller in tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use minitranslator::store::MemoryStore;
use minitranslator::{
    AvailabilityProbe, Config, Controller, LanguageId, LanguagePair, ModelAvailabilityChanged,
    ProbeError, ProbeStatus, TranslationError, Translator,
};
use tokio::sync::broadcast;

pub fn en_ko() -> LanguagePair {
    LanguagePair::new(LanguageId::English, LanguageId::Korean)
}

pub fn memory_config() -> Config {
    Config::new(Arc::new(MemoryStore::new()))
}

pub fn controller(
    translator: &Arc<ScriptedTranslator>,
    probe: &Arc<ScriptedProbe>,
    config: Config,
) -> Controller {
    minitranslator::log::init();
    Controller::new(translator.clone(), probe.clone(), config)
}

/// Let spawned tasks and virtual timers run for `secs` seconds.
pub async fn advance(secs: f64) {
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}

/// Collect every notice received so far
pub fn drain(rx: &mut broadcast::Receiver<ModelAvailabilityChanged>) -> Vec<ModelAvailabilityChanged> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn count_in_progress(events: &[ModelAvailabilityChanged]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ModelAvailabilityChanged::DownloadInProgress { .. }))
        .count()
}

pub fn count_complete(events: &[ModelAvailabilityChanged]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, ModelAvailabilityChanged::DownloadComplete { .. }))
        .count()
}

type Response = (Duration, Result<String, TranslationError>);

/// Translator answering from a script, then from a fallback.
pub struct ScriptedTranslator {
    script: Mutex<VecDeque<Response>>,
    fallback: Result<String, TranslationError>,
    calls: AtomicUsize,
    invalidations: AtomicUsize,
    inputs: Mutex<Vec<(String, LanguagePair)>>,
}

impl ScriptedTranslator {
    pub fn new(fallback: Result<String, TranslationError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
            invalidations: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(text: &str) -> Self {
        Self::new(Ok(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(Err(TranslationError::Failed("model not ready".to_string())))
    }

    /// Queue a response returned after `delay_secs` of virtual time
    pub fn then(self, delay_secs: u64, result: Result<&str, TranslationError>) -> Self {
        self.script.lock().unwrap().push_back((
            Duration::from_secs(delay_secs),
            result.map(str::to_string),
        ));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invalidations(&self) -> usize {
        self.invalidations.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<(String, LanguagePair)> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for ScriptedTranslator {
    async fn translate(&self, text: &str, pair: LanguagePair) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push((text.to_string(), pair));

        let next = self.script.lock().unwrap().pop_front();
        let (delay, result) = next.unwrap_or((Duration::ZERO, self.fallback.clone()));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    fn invalidate(&self, _pair: LanguagePair) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Probe answering from a script; the last entry repeats forever.
pub struct ScriptedProbe {
    script: Vec<Result<ProbeStatus, ProbeError>>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(script: Vec<Result<ProbeStatus, ProbeError>>) -> Self {
        assert!(!script.is_empty(), "probe script must not be empty");
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn statuses(statuses: &[ProbeStatus]) -> Self {
        Self::new(statuses.iter().copied().map(Ok).collect())
    }

    pub fn always(status: ProbeStatus) -> Self {
        Self::statuses(&[status])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityProbe for ScriptedProbe {
    async fn status(&self, _pair: LanguagePair) -> Result<ProbeStatus, ProbeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let index = call.min(self.script.len() - 1);
        self.script[index].clone()
    }
}
