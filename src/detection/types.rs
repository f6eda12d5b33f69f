use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Region of interest in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub id: String,
    pub label: String,
    pub confidence: f64,
    #[serde(rename = "bbox", alias = "boundingBox", default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl Detection {
    pub fn new(id: impl Into<String>, label: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            confidence,
            bounding_box: None,
        }
    }

    pub fn with_bounding_box(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.bounding_box = Some(BoundingBox {
            x,
            y,
            width,
            height,
        });
        self
    }
}

/// Output of one successful analyze call. Detections keep the order the
/// backend returned them in.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
    pub elapsed: Duration,
    pub analyzed_at: DateTime<Utc>,
}

impl DetectionResult {
    pub fn new(detections: Vec<Detection>, elapsed: Duration) -> Self {
        Self {
            detections,
            elapsed,
            analyzed_at: Utc::now(),
        }
    }

    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn max_confidence(&self) -> Option<f64> {
        self.detections
            .iter()
            .map(|d| d.confidence)
            .fold(None, |max, c| Some(max.map_or(c, |m: f64| m.max(c))))
    }

    /// Drops detections under `floor`, preserving order.
    pub fn retain_above(mut self, floor: f64) -> Self {
        if floor > 0.0 {
            self.detections.retain(|d| d.confidence >= floor);
        }
        self
    }
}
