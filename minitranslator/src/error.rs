use derive_more::{Display, From};

/// Errors surfaced by the public API outside the translation lifecycle.
///
/// Translator and probe failures never appear here: the controller turns
/// them into status messages.
#[derive(Debug, Display, From)]
pub enum Error {
    #[from]
    #[display("Language error: {_0}")]
    Language(minitranslator_languages::LanguageError),

    #[from]
    #[display("Store error: {_0}")]
    Store(crate::store::StoreError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Language(e) => Some(e),
            Error::Store(e) => Some(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
