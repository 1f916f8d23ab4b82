use async_trait::async_trait;
use minitranslator_languages::LanguagePair;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("Translation model not installed for {0}")]
    ModelNotInstalled(LanguagePair),
    #[error("Translation session was cancelled")]
    Cancelled,
    #[error("Translation failed: {0}")]
    Failed(String),
}

/// On-device translation engine.
///
/// Implementations wrap the platform translation service. The controller
/// treats every error the same way, so implementations don't need to
/// classify failures precisely.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `pair.source` to `pair.target`
    async fn translate(&self, text: &str, pair: LanguagePair) -> Result<String, TranslationError>;

    /// Drop any session prepared for `pair`, so the next `translate` call
    /// starts from a fresh configuration.
    ///
    /// Called before retrying a translation once the pair's model finished
    /// installing.
    fn invalidate(&self, _pair: LanguagePair) {}
}
