pub mod app;
pub mod config;
pub mod detection;
pub mod error;
pub mod intake;
pub mod render;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{AppError, DetectionError, ErrorInfo, ErrorKind, InputError, SessionError};

pub use detection::{DetectConfig, DetectionClient, DetectionResult};
pub use intake::{ImageFile, ImageHandle, ImagePicker};
pub use render::{ResultsRenderer, ResultsView, RiskLevel};
pub use session::{AnalysisSession, AnalyzeOutcome, SessionState, SessionStatus};
