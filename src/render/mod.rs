mod results_view;
mod risk;

pub use results_view::{DetectionRow, ResultsRenderer, ResultsView};
pub use risk::{overall_risk, RiskLevel, Tone};
