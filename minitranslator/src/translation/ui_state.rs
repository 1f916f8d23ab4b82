use minitranslator_languages::LanguagePair;
use serde::{Deserialize, Serialize};

/// Short status shown under the translation result
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatusMessage {
    /// Source and target are the same; the input was echoed back
    LanguagesIdentical,
    /// The translation failed; shown for every translator error
    ModelDownloading,
    /// The platform cannot translate the selected pair
    PairUnsupported,
}

impl StatusMessage {
    /// Informational notices are rendered without error styling
    pub fn is_error(self) -> bool {
        !matches!(self, StatusMessage::LanguagesIdentical)
    }

    /// Returns a user-friendly message suitable for display in the UI
    pub fn user_message(self) -> &'static str {
        match self {
            StatusMessage::LanguagesIdentical => {
                "Source and target languages are the same."
            }
            StatusMessage::ModelDownloading => {
                "The language model is downloading. Translation will resume when it's ready."
            }
            StatusMessage::PairUnsupported => {
                "This language pair is not supported for on-device translation."
            }
        }
    }
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub input_text: String,
    pub translated_text: String,
    pub error_message: Option<StatusMessage>,
    pub is_downloading_model: bool,
    /// Id of the latest triggered request (0 before the first trigger)
    pub request_id: u64,
    pub pair: LanguagePair,
}

impl UiState {
    /// Whether there is a result to copy
    pub fn has_result(&self) -> bool {
        !self.translated_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_strings() {
        let cases = vec![
            (StatusMessage::LanguagesIdentical, "languages-identical", false),
            (StatusMessage::ModelDownloading, "model-downloading", true),
            (StatusMessage::PairUnsupported, "pair-unsupported", true),
        ];

        for (message, expected, is_error) in cases {
            assert_eq!(message.to_string(), expected);
            assert_eq!(message.as_ref(), expected);
            assert_eq!(
                serde_json::to_value(message).unwrap(),
                serde_json::Value::String(expected.to_string())
            );
            assert_eq!(message.is_error(), is_error, "{}", expected);
            assert!(!message.user_message().is_empty());
        }
    }

    #[test]
    fn test_ui_state_serializes_camel_case() {
        let state = UiState {
            input_text: "hello".to_string(),
            error_message: Some(StatusMessage::ModelDownloading),
            ..UiState::default()
        };
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["inputText"], "hello");
        assert_eq!(json["translatedText"], "");
        assert_eq!(json["errorMessage"], "model-downloading");
        assert_eq!(json["isDownloadingModel"], false);
        assert_eq!(json["requestId"], 0);
        assert!(!state.has_result());
    }
}
