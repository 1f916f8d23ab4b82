//! MiniTranslator core: the translation request lifecycle behind the menu
//! bar popover.
//!
//! The presentation layer owns a [`Controller`], forwards user intents to it
//! and renders the [`UiState`] snapshots and [`ModelAvailabilityChanged`]
//! notices it publishes. The platform translation service is plugged in
//! through the [`Translator`] and [`AvailabilityProbe`] traits.

pub mod availability;
pub mod clients;
pub mod config;
mod error;
pub mod log;
pub mod store;
pub mod translation;

pub use availability::events::ModelAvailabilityChanged;
pub use clients::{AvailabilityProbe, ProbeError, ProbeStatus, TranslationError, Translator};
pub use config::{Config, ConfigStore, FlagStore, TranslatorConfig};
pub use error::{Error, Result};
pub use minitranslator_languages::{LanguageError, LanguageId, LanguagePair};
pub use translation::{Controller, RequestId, StatusMessage, UiState};
