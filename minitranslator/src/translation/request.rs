use minitranslator_languages::LanguagePair;
use serde::{Deserialize, Serialize};

/// Monotonic identifier of a translation attempt.
///
/// Only the attempt holding the latest id may change the UI state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// One triggered translation. Superseded by the next trigger, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub id: RequestId,
    pub pair: LanguagePair,
    pub input: String,
}
