use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::detection::{DetectConfig, Detection, DetectionClient, DetectionResult};
use crate::error::DetectionError;
use crate::intake::ImageHandle;

pub const STUB_DELAY: Duration = Duration::from_millis(2000);

/// Placeholder backend: waits a fixed delay and answers with canned findings.
/// Never fails and never honours the timeout.
#[derive(Debug, Clone)]
pub struct StubDetectionClient {
    delay: Duration,
    detections: Vec<Detection>,
}

impl Default for StubDetectionClient {
    fn default() -> Self {
        Self::new(STUB_DELAY)
    }
}

impl StubDetectionClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            detections: vec![
                Detection::new("1", "Suspicious Mass", 0.85).with_bounding_box(120.0, 80.0, 60.0, 45.0),
                Detection::new("2", "Nodule", 0.72).with_bounding_box(200.0, 150.0, 30.0, 25.0),
            ],
        }
    }

    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = detections;
        self
    }
}

#[async_trait]
impl DetectionClient for StubDetectionClient {
    #[instrument(skip_all, fields(image = %image.id(), client = "stub"))]
    async fn detect(
        &self,
        image: &ImageHandle,
        config: &DetectConfig,
    ) -> Result<DetectionResult, DetectionError> {
        let start = Instant::now();
        debug!("Simulating analysis of {} for {:?}", image.name(), self.delay);
        tokio::time::sleep(self.delay).await;
        Ok(DetectionResult::new(self.detections.clone(), start.elapsed())
            .retain_above(config.confidence_floor))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
