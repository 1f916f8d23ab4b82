mod controller;
mod request;
mod ui_state;

pub use controller::Controller;
pub use request::{RequestId, TranslationRequest};
pub use ui_state::{StatusMessage, UiState};
