use std::time::Duration;

use crate::detection::{BoundingBox, DetectionResult};
use crate::render::{overall_risk, RiskLevel};
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRow {
    pub id: String,
    pub label: String,
    pub confidence: f64,
    pub risk: RiskLevel,
    pub bounding_box: Option<BoundingBox>,
}

impl DetectionRow {
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

/// Display-ready results panel content.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Processing,
    AwaitingImage,
    NoAnomalies {
        elapsed: Duration,
    },
    Findings {
        overall: RiskLevel,
        elapsed: Duration,
        rows: Vec<DetectionRow>,
    },
}

impl ResultsView {
    pub const PROCESSING_TITLE: &'static str = "Analyzing Image...";
    pub const AWAITING_MESSAGE: &'static str = "Upload an image to start lung cancer detection";
    pub const NO_ANOMALIES_TITLE: &'static str = "No anomalies detected";
    pub const NO_ANOMALIES_DETAIL: &'static str = "The image appears to be normal";

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            ResultsView::NoAnomalies { elapsed } | ResultsView::Findings { elapsed, .. } => {
                Some(*elapsed)
            }
            _ => None,
        }
    }
}

pub struct ResultsRenderer;

impl ResultsRenderer {
    pub fn render(result: Option<&DetectionResult>, processing: bool) -> ResultsView {
        if processing {
            return ResultsView::Processing;
        }
        let Some(result) = result else {
            return ResultsView::AwaitingImage;
        };
        let Some(overall) = overall_risk(&result.detections) else {
            return ResultsView::NoAnomalies {
                elapsed: result.elapsed,
            };
        };
        let rows = result
            .detections
            .iter()
            .map(|d| DetectionRow {
                id: d.id.clone(),
                label: d.label.clone(),
                confidence: d.confidence,
                risk: RiskLevel::classify(d.confidence),
                bounding_box: d.bounding_box,
            })
            .collect();
        ResultsView::Findings {
            overall,
            elapsed: result.elapsed,
            rows,
        }
    }

    pub fn render_state(state: &SessionState) -> ResultsView {
        Self::render(state.result.as_ref(), state.is_processing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Detection;

    fn result(detections: Vec<Detection>) -> DetectionResult {
        DetectionResult::new(detections, Duration::from_millis(2004))
    }

    #[test]
    fn test_processing_wins() {
        let r = result(vec![Detection::new("1", "Mass", 0.9)]);
        assert_eq!(ResultsRenderer::render(Some(&r), true), ResultsView::Processing);
        assert_eq!(ResultsRenderer::render(None, true), ResultsView::Processing);
    }

    #[test]
    fn test_no_result_awaits_image() {
        assert_eq!(ResultsRenderer::render(None, false), ResultsView::AwaitingImage);
        assert_eq!(ResultsView::AwaitingImage.elapsed(), None);
    }

    #[test]
    fn test_empty_result_reports_no_anomalies() {
        let view = ResultsRenderer::render(Some(&result(vec![])), false);
        assert_eq!(
            view,
            ResultsView::NoAnomalies {
                elapsed: Duration::from_millis(2004)
            }
        );
    }

    #[test]
    fn test_findings_keep_return_order() {
        let r = result(vec![
            Detection::new("b", "Nodule", 0.42),
            Detection::new("a", "Suspicious Mass", 0.85).with_bounding_box(120.0, 80.0, 60.0, 45.0),
            Detection::new("c", "Nodule", 0.72),
        ]);
        let ResultsView::Findings {
            overall,
            elapsed,
            rows,
        } = ResultsRenderer::render(Some(&r), false)
        else {
            panic!("expected findings");
        };
        assert_eq!(overall, RiskLevel::High);
        assert_eq!(elapsed, Duration::from_millis(2004));
        let ids: Vec<_> = rows.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        let risks: Vec<_> = rows.iter().map(|row| row.risk).collect();
        assert_eq!(risks, vec![RiskLevel::Low, RiskLevel::High, RiskLevel::Medium]);
        assert!(rows[1].bounding_box.is_some());
    }

    #[test]
    fn test_confidence_percent() {
        let row = DetectionRow {
            id: "1".into(),
            label: "Nodule".into(),
            confidence: 0.725,
            risk: RiskLevel::Medium,
            bounding_box: None,
        };
        assert_eq!(row.confidence_percent(), "72.5%");
    }
}
