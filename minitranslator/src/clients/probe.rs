use async_trait::async_trait;
use minitranslator_languages::LanguagePair;
use serde::{Deserialize, Serialize};

/// Model availability reported by the platform for a language pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ProbeStatus {
    /// Supported, model not installed yet (a download is needed or running)
    Downloadable,
    /// Model installed, translation can run offline
    Installed,
    /// The platform cannot translate this pair
    Unsupported,
    /// The platform could not tell yet
    Unknown,
}

impl ProbeStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ProbeStatus::Installed | ProbeStatus::Unsupported)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("Availability check failed: {0}")]
    Failed(String),
}

/// Reports whether the model for a language pair is installed.
#[async_trait]
pub trait AvailabilityProbe: Send + Sync {
    async fn status(&self, pair: LanguagePair) -> Result<ProbeStatus, ProbeError>;
}
