use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{BackendKind, DetectionSettings};
use crate::detection::{DetectionClient, HttpDetectionClient, StubDetectionClient};
use crate::error::AppError;

pub fn create_detection_client(
    settings: &DetectionSettings,
) -> Result<Arc<dyn DetectionClient>, AppError> {
    let client: Arc<dyn DetectionClient> = match settings.backend {
        BackendKind::Stub => Arc::new(StubDetectionClient::new(Duration::from_millis(
            settings.stub_delay_ms,
        ))),
        BackendKind::Http => Arc::new(HttpDetectionClient::new()?),
    };
    info!("Using {} detection backend", client.name());
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_backend_from_settings() {
        let stub = create_detection_client(&DetectionSettings::default()).unwrap();
        assert_eq!(stub.name(), "stub");

        let http = create_detection_client(&DetectionSettings {
            backend: BackendKind::Http,
            ..DetectionSettings::default()
        })
        .unwrap();
        assert_eq!(http.name(), "http");
    }
}
