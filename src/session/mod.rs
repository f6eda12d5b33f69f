mod analysis_session;
mod state;

pub use analysis_session::{AnalysisSession, AnalyzeOutcome};
pub use state::{SessionState, SessionStatus};
