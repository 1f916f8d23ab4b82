//! Model Availability State Machine - per-pair status and shown-once latches
//!
//! State diagram (one per language pair):
//! ```text
//! Unknown ──downloadable──> DownloadingNotified ──installed──> Installed
//!    │                            │      ↺ downloadable
//!    │                       unsupported
//!    │                            ↓
//!    └────────unsupported────> Unsupported
//!    └────────installed──────> Installed
//! ```
//!
//! `Downloadable` is recorded when a superseded poll observes the status:
//! the fact is kept, but no notice was shown for it.
//!
//! Latches:
//! - "download in progress" is shown at most once per pair per process
//! - "download complete" is shown at most once per pair, ever (persisted)

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use minitranslator_languages::LanguagePair;

use crate::clients::ProbeStatus;
use crate::config::{download_complete_flag_key, FlagStore};
use crate::store::StoreError;

/// Availability of a pair's model as last observed in this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PairAvailability {
    /// Not probed yet
    #[default]
    Unknown,
    /// Observed installable, no notice shown for it
    Downloadable,
    /// Observed installable, "download in progress" notice shown
    DownloadingNotified,
    Installed,
    Unsupported,
}

/// Side effects the controller performs after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEffect {
    /// Mark the model as downloading in the UI state
    ShowDownloading,
    /// Clear the downloading mark in the UI state
    HideDownloading,
    NotifyDownloadInProgress,
    NotifyDownloadComplete,
    /// Surface the unsupported-pair message
    ReportUnsupported,
    /// Re-run the failed translation for the same request
    RetryTranslation,
}

/// Whether the poll loop keeps going after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    Stop,
}

/// Flags that gate one-time effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latches {
    /// "download in progress" already shown in this process
    pub download_notified: bool,
    /// "download complete" already shown in any previous run
    pub complete_shown: bool,
    /// The current request's translation failed and waits for the model
    pub needs_retry: bool,
}

/// Result of feeding one probe observation into the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: PairAvailability,
    pub effects: Vec<PollEffect>,
    pub step: PollStep,
}

impl Transition {
    pub fn has_effect(&self, effect: PollEffect) -> bool {
        self.effects.contains(&effect)
    }
}

/// Pure function: compute the next state and effects for one probe tick.
///
/// `observed` is `None` when the probe call failed; that tick changes
/// nothing and polling continues.
pub fn transition(
    current: PairAvailability,
    observed: Option<ProbeStatus>,
    latches: Latches,
) -> Transition {
    match observed {
        None | Some(ProbeStatus::Unknown) => Transition {
            next: current,
            effects: Vec::new(),
            step: PollStep::Continue,
        },

        Some(ProbeStatus::Downloadable) => {
            let mut effects = vec![PollEffect::ShowDownloading];
            if !latches.download_notified {
                effects.push(PollEffect::NotifyDownloadInProgress);
            }
            Transition {
                next: PairAvailability::DownloadingNotified,
                effects,
                step: PollStep::Continue,
            }
        }

        Some(ProbeStatus::Installed) => {
            let mut effects = vec![PollEffect::HideDownloading];
            if !latches.complete_shown {
                effects.push(PollEffect::NotifyDownloadComplete);
            }
            if latches.needs_retry {
                effects.push(PollEffect::RetryTranslation);
            }
            Transition {
                next: PairAvailability::Installed,
                effects,
                step: PollStep::Stop,
            }
        }

        Some(ProbeStatus::Unsupported) => Transition {
            next: PairAvailability::Unsupported,
            effects: vec![PollEffect::HideDownloading, PollEffect::ReportUnsupported],
            step: PollStep::Stop,
        },
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PairEntry {
    state: PairAvailability,
    download_notified: bool,
    /// Raised on commit, ahead of the persisted flag
    complete_shown: bool,
}

/// Thread-safe per-pair availability registry.
///
/// Lives as long as the controller. The download-complete latch is read from
/// the injected flag store and written back by [`persist`](Self::persist) so
/// it survives restarts.
pub struct AvailabilityTracker {
    entries: Mutex<HashMap<LanguagePair, PairEntry>>,
    flags: Arc<dyn FlagStore>,
}

impl AvailabilityTracker {
    pub fn new(flags: Arc<dyn FlagStore>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            flags,
        }
    }

    /// Current state for `pair` (read-only, thread-safe)
    pub fn state(&self, pair: LanguagePair) -> PairAvailability {
        self.entry(pair).state
    }

    pub fn latches(&self, pair: LanguagePair, needs_retry: bool) -> Latches {
        let entry = self.entry(pair);
        Latches {
            download_notified: entry.download_notified,
            complete_shown: entry.complete_shown
                || self.flags.get_flag(&download_complete_flag_key(pair)),
            needs_retry,
        }
    }

    /// Compute the transition for an observation made on behalf of the
    /// current request. Nothing is stored until [`commit`](Self::commit).
    pub fn evaluate(
        &self,
        pair: LanguagePair,
        observed: Option<ProbeStatus>,
        needs_retry: bool,
    ) -> Transition {
        transition(self.state(pair), observed, self.latches(pair, needs_retry))
    }

    /// Store a transition's state and raise the latches its effects consume.
    ///
    /// Only touches memory, so it is safe to call under the controller lock.
    /// The download-complete latch reaches disk through
    /// [`persist`](Self::persist).
    pub fn commit(&self, pair: LanguagePair, transition: &Transition) {
        let mut entries = self.lock();
        let entry = entries.entry(pair).or_default();
        entry.state = transition.next;
        if transition.has_effect(PollEffect::NotifyDownloadInProgress) {
            entry.download_notified = true;
        }
        if transition.has_effect(PollEffect::NotifyDownloadComplete) {
            entry.complete_shown = true;
        }
    }

    /// Write the latches of a committed transition to the flag store.
    ///
    /// May block on file I/O; call it without holding other locks.
    pub fn persist(&self, pair: LanguagePair, transition: &Transition) -> Result<(), StoreError> {
        if transition.has_effect(PollEffect::NotifyDownloadComplete) {
            self.flags.set_flag(&download_complete_flag_key(pair))?;
        }
        Ok(())
    }

    /// Record an observation from a superseded poll: keeps the fact, touches
    /// no latch.
    pub fn record(&self, pair: LanguagePair, observed: ProbeStatus) {
        let mut entries = self.lock();
        let entry = entries.entry(pair).or_default();
        entry.state = match observed {
            ProbeStatus::Downloadable if entry.download_notified => {
                PairAvailability::DownloadingNotified
            }
            ProbeStatus::Downloadable => PairAvailability::Downloadable,
            ProbeStatus::Installed => PairAvailability::Installed,
            ProbeStatus::Unsupported => PairAvailability::Unsupported,
            ProbeStatus::Unknown => entry.state,
        };
    }

    fn entry(&self, pair: LanguagePair) -> PairEntry {
        self.lock().get(&pair).copied().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<LanguagePair, PairEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
