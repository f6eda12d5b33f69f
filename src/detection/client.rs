use std::time::Duration;

use async_trait::async_trait;

use crate::detection::DetectionResult;
use crate::error::DetectionError;
use crate::intake::ImageHandle;

/// Per-call settings for a detect request.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectConfig {
    pub endpoint: String,
    pub timeout: Duration,
    /// Detections scoring below this are dropped client-side. 0.0 shows all.
    pub confidence_floor: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8000/detect".to_string(),
            timeout: Duration::from_secs(30),
            confidence_floor: 0.0,
        }
    }
}

/// One-shot image analysis against a detection backend.
///
/// Implementations enforce `config.timeout` themselves and report failures
/// through the `DetectionError` taxonomy. Callers guarantee at most one
/// outstanding call per session.
#[async_trait]
pub trait DetectionClient: Send + Sync {
    async fn detect(
        &self,
        image: &ImageHandle,
        config: &DetectConfig,
    ) -> Result<DetectionResult, DetectionError>;

    fn name(&self) -> &'static str;
}
