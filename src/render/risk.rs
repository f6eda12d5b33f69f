use crate::detection::Detection;

pub const HIGH_THRESHOLD: f64 = 0.8;
pub const MEDIUM_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Presentation tone a risk level maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Destructive,
    Warning,
    Success,
}

impl RiskLevel {
    /// Boundary values fall into the upper band.
    pub fn classify(confidence: f64) -> Self {
        if confidence >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if confidence >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::High => "High",
            RiskLevel::Medium => "Medium",
            RiskLevel::Low => "Low",
        }
    }

    pub fn badge(self) -> String {
        format!("{} Risk", self.label())
    }

    pub fn tone(self) -> Tone {
        match self {
            RiskLevel::High => Tone::Destructive,
            RiskLevel::Medium => Tone::Warning,
            RiskLevel::Low => Tone::Success,
        }
    }
}

/// Risk of the most confident detection, or `None` when nothing was found.
pub fn overall_risk(detections: &[Detection]) -> Option<RiskLevel> {
    detections
        .iter()
        .map(|d| d.confidence)
        .reduce(f64::max)
        .map(RiskLevel::classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_bands() {
        assert_eq!(RiskLevel::classify(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(0.49), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(0.5), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.79), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.8), RiskLevel::High);
        assert_eq!(RiskLevel::classify(1.0), RiskLevel::High);
    }

    #[test]
    fn test_classify_matches_thresholds_across_range() {
        for step in 0..=1000 {
            let c = step as f64 / 1000.0;
            let expected = if c >= 0.8 {
                RiskLevel::High
            } else if c >= 0.5 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            assert_eq!(RiskLevel::classify(c), expected, "confidence {}", c);
        }
    }

    #[test]
    fn test_overall_risk_driven_by_max() {
        let detections = vec![
            Detection::new("1", "Suspicious Mass", 0.85),
            Detection::new("2", "Nodule", 0.72),
        ];
        assert_eq!(overall_risk(&detections), Some(RiskLevel::High));

        let low_first = vec![
            Detection::new("1", "Nodule", 0.2),
            Detection::new("2", "Nodule", 0.6),
        ];
        assert_eq!(overall_risk(&low_first), Some(RiskLevel::Medium));
    }

    #[test]
    fn test_overall_risk_empty() {
        assert_eq!(overall_risk(&[]), None);
    }

    #[test]
    fn test_tones_and_badges() {
        assert_eq!(RiskLevel::High.tone(), Tone::Destructive);
        assert_eq!(RiskLevel::Medium.tone(), Tone::Warning);
        assert_eq!(RiskLevel::Low.tone(), Tone::Success);
        assert_eq!(RiskLevel::Medium.badge(), "Medium Risk");
    }
}
