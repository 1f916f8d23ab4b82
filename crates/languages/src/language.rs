//! Catalog of supported languages.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::LanguageError;

/// A language offered in the pickers.
///
/// Variant order is the picker order. The serialized form is the stable
/// identifier (`"ko"`, `"en"`, `"ja"`, `"zh-Hans"`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum LanguageId {
    #[serde(rename = "ko")]
    #[strum(serialize = "ko")]
    Korean,
    #[serde(rename = "en")]
    #[strum(serialize = "en")]
    English,
    #[serde(rename = "ja")]
    #[strum(serialize = "ja")]
    Japanese,
    #[serde(rename = "zh-Hans")]
    #[strum(serialize = "zh-Hans")]
    ChineseSimplified,
}

impl LanguageId {
    /// Stable identifier, e.g. `"zh-Hans"`
    pub fn id(self) -> &'static str {
        match self {
            LanguageId::Korean => "ko",
            LanguageId::English => "en",
            LanguageId::Japanese => "ja",
            LanguageId::ChineseSimplified => "zh-Hans",
        }
    }

    /// Name shown in the picker, in the language itself
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageId::Korean => "한국어",
            LanguageId::English => "English",
            LanguageId::Japanese => "日本語",
            LanguageId::ChineseSimplified => "中文",
        }
    }

    /// Resolve a catalog identifier.
    pub fn from_id(id: &str) -> Result<Self, LanguageError> {
        LanguageId::iter()
            .find(|language| language.id() == id)
            .ok_or_else(|| LanguageError::UnsupportedLanguage(id.to_string()))
    }
}

impl FromStr for LanguageId {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

/// All supported languages in picker order.
pub fn catalog() -> Vec<LanguageId> {
    LanguageId::iter().collect()
}
