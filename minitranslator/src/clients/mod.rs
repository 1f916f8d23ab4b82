mod probe;
mod translator;

pub use probe::{AvailabilityProbe, ProbeError, ProbeStatus};
pub use translator::{TranslationError, Translator};
