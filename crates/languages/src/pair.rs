use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LanguageError, LanguageId};

/// A (source, target) language selection.
///
/// Equal source and target is a valid selection; the translation core
/// short-circuits it instead of calling the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguagePair {
    pub source: LanguageId,
    pub target: LanguageId,
}

impl LanguagePair {
    pub fn new(source: LanguageId, target: LanguageId) -> Self {
        Self { source, target }
    }

    /// Build a pair from catalog identifiers.
    pub fn parse(source: &str, target: &str) -> Result<Self, LanguageError> {
        Ok(Self {
            source: LanguageId::from_id(source)?,
            target: LanguageId::from_id(target)?,
        })
    }

    pub fn swapped(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    pub fn is_identical(self) -> bool {
        self.source == self.target
    }

    /// Canonical `"<source>-<target>"` form used to derive persisted keys.
    pub fn key_suffix(self) -> String {
        format!("{}-{}", self.source.id(), self.target.id())
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: LanguageId::Korean,
            target: LanguageId::English,
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}
