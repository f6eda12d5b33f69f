use crate::detection::DetectionResult;
use crate::error::ErrorInfo;
use crate::intake::ImageHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Ready,
    Processing,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn badge(self) -> &'static str {
        match self {
            SessionStatus::Idle => "No image",
            SessionStatus::Ready => "Ready",
            SessionStatus::Processing => "Processing...",
            SessionStatus::Completed => "Analysis Complete",
            SessionStatus::Failed => "Analysis Failed",
        }
    }

    pub fn can_analyze(self) -> bool {
        matches!(self, SessionStatus::Ready | SessionStatus::Failed)
    }
}

/// What the view currently displays. Always replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub image: Option<ImageHandle>,
    pub status: SessionStatus,
    pub result: Option<DetectionResult>,
    pub error: Option<ErrorInfo>,
}

impl SessionState {
    pub fn ready(image: ImageHandle) -> Self {
        Self {
            image: Some(image),
            status: SessionStatus::Ready,
            result: None,
            error: None,
        }
    }

    pub fn is_processing(&self) -> bool {
        self.status == SessionStatus::Processing
    }

    pub(crate) fn processing(&self) -> Self {
        Self {
            image: self.image.clone(),
            status: SessionStatus::Processing,
            result: None,
            error: None,
        }
    }

    pub(crate) fn completed(&self, result: DetectionResult) -> Self {
        Self {
            image: self.image.clone(),
            status: SessionStatus::Completed,
            result: Some(result),
            error: None,
        }
    }

    pub(crate) fn failed(&self, error: ErrorInfo) -> Self {
        Self {
            image: self.image.clone(),
            status: SessionStatus::Failed,
            result: None,
            error: Some(error),
        }
    }

    pub(crate) fn with_error(&self, error: ErrorInfo) -> Self {
        Self {
            error: Some(error),
            ..self.clone()
        }
    }
}
