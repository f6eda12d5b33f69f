mod client;
mod factory;
mod http_client;
mod stub_client;
mod types;
mod wire;

pub use client::{DetectConfig, DetectionClient};
pub use factory::create_detection_client;
pub use http_client::{DetectRequest, HttpDetectionClient, HttpDetectionService, MAX_RESPONSE_BYTES};
pub use stub_client::StubDetectionClient;
pub use types::{BoundingBox, Detection, DetectionResult};
pub use wire::decode_response;
