//! Language catalog and language-pair values for MiniTranslator.
//!
//! The catalog is fixed and small: it lists the languages offered in the
//! source/target pickers. Every [`LanguagePair`] is built from catalog
//! entries, so an unknown identifier can never reach the translation core.
//!
//! # Example
//!
//! ```
//! use minitranslator_languages::{LanguageId, LanguagePair};
//!
//! let pair = LanguagePair::parse("en", "ko").unwrap();
//! assert_eq!(pair.source, LanguageId::English);
//! assert_eq!(pair.swapped().source, LanguageId::Korean);
//! ```

mod detect;
mod language;
mod pair;

pub use detect::{detect_language, detect_pair};
pub use language::{catalog, LanguageId};
pub use pair::LanguagePair;

use thiserror::Error;

/// Errors produced when resolving language identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LanguageError {
    /// The identifier is not part of the supported catalog.
    #[error("Unsupported language identifier: {0}")]
    UnsupportedLanguage(String),
}
