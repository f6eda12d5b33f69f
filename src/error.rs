use std::time::Duration;

use thiserror::Error;

use crate::session::SessionStatus;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Settings Error: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("Invalid setting `{0}`: {1}")]
    InvalidSetting(&'static str, String),
    #[error("Input Error: {0}")]
    Input(#[from] InputError),
    #[error("Detection Error: {0}")]
    Detection(#[from] DetectionError),
    #[error("Session Error: {0}")]
    Session(#[from] SessionError),
    #[error("UI Error: {0}")]
    Ui(String),
}

// Rejected image selections, raised before any network activity.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("'{media_type}' is not an image")]
    NotAnImage { media_type: String },
    #[error("Unsupported image type '{media_type}', use JPEG, PNG or WebP")]
    UnsupportedMediaType { media_type: String },
    #[error("Image is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("Image file is empty")]
    Empty,
    #[error("Failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Network failure: {0}")]
    Network(String),
    #[error("No response within {0:?}")]
    Timeout(Duration),
    #[error("Server responded with status {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Malformed detection response: {0}")]
    Decode(String),
    #[error("Analysis was interrupted before it finished")]
    Interrupted,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),
    #[error("An analysis is already in flight for this session")]
    ConcurrentCall,
    #[error("Cannot {operation} while {from:?}")]
    InvalidTransition {
        operation: &'static str,
        from: SessionStatus,
    },
}

/// Closed set of failure kinds kept in the session for display and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ConcurrentCall,
    InvalidTransition,
    Network,
    Timeout,
    Server,
    Decode,
    Interrupted,
}

impl ErrorKind {
    pub fn is_detection_failure(self) -> bool {
        matches!(
            self,
            ErrorKind::Network
                | ErrorKind::Timeout
                | ErrorKind::Server
                | ErrorKind::Decode
                | ErrorKind::Interrupted
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub detail: String,
}

impl ErrorInfo {
    pub const ANALYSIS_FAILED: &'static str = "Analysis failed, please retry.";

    /// Text shown to the user. Detection failures collapse into one generic
    /// message; `detail` keeps the underlying cause.
    pub fn user_message(&self) -> &str {
        if self.kind.is_detection_failure() {
            Self::ANALYSIS_FAILED
        } else {
            &self.detail
        }
    }
}

impl From<&InputError> for ErrorInfo {
    fn from(error: &InputError) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            detail: error.to_string(),
        }
    }
}

impl From<&DetectionError> for ErrorInfo {
    fn from(error: &DetectionError) -> Self {
        let kind = match error {
            DetectionError::Network(_) => ErrorKind::Network,
            DetectionError::Timeout(_) => ErrorKind::Timeout,
            DetectionError::Server { .. } => ErrorKind::Server,
            DetectionError::Decode(_) => ErrorKind::Decode,
            DetectionError::Interrupted => ErrorKind::Interrupted,
        };
        Self {
            kind,
            detail: error.to_string(),
        }
    }
}

impl From<&SessionError> for ErrorInfo {
    fn from(error: &SessionError) -> Self {
        match error {
            SessionError::InvalidInput(input) => input.into(),
            SessionError::ConcurrentCall => Self {
                kind: ErrorKind::ConcurrentCall,
                detail: error.to_string(),
            },
            SessionError::InvalidTransition { .. } => Self {
                kind: ErrorKind::InvalidTransition,
                detail: error.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_failures_share_generic_message() {
        let errors = [
            DetectionError::Network("dns".into()),
            DetectionError::Timeout(Duration::from_secs(1)),
            DetectionError::Server {
                status: 502,
                message: "bad gateway".into(),
            },
            DetectionError::Decode("missing field".into()),
            DetectionError::Interrupted,
        ];
        for error in &errors {
            let info = ErrorInfo::from(error);
            assert_eq!(info.user_message(), ErrorInfo::ANALYSIS_FAILED);
            assert_eq!(info.detail, error.to_string());
        }
    }

    #[test]
    fn test_input_error_keeps_specific_message() {
        let info = ErrorInfo::from(&InputError::NotAnImage {
            media_type: "text/plain".into(),
        });
        assert_eq!(info.kind, ErrorKind::InvalidInput);
        assert_eq!(info.user_message(), "'text/plain' is not an image");
    }

    #[test]
    fn test_session_error_kinds() {
        assert_eq!(
            ErrorInfo::from(&SessionError::ConcurrentCall).kind,
            ErrorKind::ConcurrentCall
        );
        let transition = SessionError::InvalidTransition {
            operation: "analyze",
            from: SessionStatus::Idle,
        };
        assert_eq!(
            ErrorInfo::from(&transition).kind,
            ErrorKind::InvalidTransition
        );
    }
}
