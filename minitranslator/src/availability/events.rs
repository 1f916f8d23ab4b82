//! Notification events for model availability.
//!
//! Each event is emitted at most once per relevant occurrence; the
//! presentation layer turns them into user-visible notices.

use minitranslator_languages::LanguagePair;
use serde::{Deserialize, Serialize};

/// Model availability notice - single event stream for all availability notices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ModelAvailabilityChanged {
    /// The pair's model is being downloaded
    #[serde(rename = "download-in-progress")]
    DownloadInProgress { pair: LanguagePair },
    /// The pair's model finished installing
    #[serde(rename = "download-complete")]
    DownloadComplete { pair: LanguagePair },
    /// The platform cannot translate this pair
    #[serde(rename = "pair-unsupported")]
    PairUnsupported { pair: LanguagePair },
}

impl ModelAvailabilityChanged {
    pub fn pair(&self) -> LanguagePair {
        match self {
            ModelAvailabilityChanged::DownloadInProgress { pair }
            | ModelAvailabilityChanged::DownloadComplete { pair }
            | ModelAvailabilityChanged::PairUnsupported { pair } => *pair,
        }
    }
}
