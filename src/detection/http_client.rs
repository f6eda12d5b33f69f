use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tower::timeout::error::Elapsed;
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::detection::{decode_response, DetectConfig, DetectionClient, DetectionResult};
use crate::error::DetectionError;
use crate::intake::ImageHandle;

const MAX_ERROR_BODY: usize = 200;
/// Ceiling on a successful response body; larger bodies are a decode error.
pub const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

/// Image payload bound for the detection endpoint.
#[derive(Debug, Clone)]
pub struct DetectRequest {
    pub image_id: Uuid,
    pub media_type: String,
    pub payload: Arc<[u8]>,
    pub confidence_floor: f64,
}

impl DetectRequest {
    pub fn for_image(image: &ImageHandle, confidence_floor: f64) -> Self {
        Self {
            image_id: image.id(),
            media_type: image.media_type().to_string(),
            payload: image.bytes().clone(),
            confidence_floor,
        }
    }
}

/// Single request/response exchange with the endpoint: POST the raw image
/// bytes, decode the JSON body.
#[derive(Debug, Clone)]
pub struct HttpDetectionService {
    client: reqwest::Client,
    endpoint: Url,
    max_response_bytes: usize,
}

impl HttpDetectionService {
    pub fn new(client: reqwest::Client, endpoint: Url, max_response_bytes: usize) -> Self {
        Self {
            client,
            endpoint,
            max_response_bytes,
        }
    }
}

impl Service<DetectRequest> for HttpDetectionService {
    type Response = DetectionResult;
    type Error = DetectionError;
    type Future = BoxFuture<'static, Result<DetectionResult, DetectionError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: DetectRequest) -> Self::Future {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let limit = self.max_response_bytes;
        Box::pin(async move {
            let start = Instant::now();
            debug!(
                "Posting {} bytes of {} to {}",
                request.payload.len(),
                request.media_type,
                endpoint
            );
            let response = client
                .post(endpoint)
                .header(CONTENT_TYPE, request.media_type.as_str())
                .body(request.payload.to_vec())
                .send()
                .await
                .map_err(|e| DetectionError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let text = match response.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("Failed to read {} error body: {}", status, e);
                        String::new()
                    }
                };
                let message: String = text.chars().take(MAX_ERROR_BODY).collect();
                return Err(DetectionError::Server {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = read_body(response, limit).await?;
            decode_response(&body, start.elapsed(), request.confidence_floor)
        })
    }
}

// Reads the body chunk by chunk and stops once it passes `limit`.
async fn read_body(mut response: reqwest::Response, limit: usize) -> Result<Vec<u8>, DetectionError> {
    let too_large = || DetectionError::Decode(format!("response body exceeds {} bytes", limit));
    if response.content_length().is_some_and(|len| len > limit as u64) {
        return Err(too_large());
    }
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| DetectionError::Network(e.to_string()))?
    {
        if body.len() + chunk.len() > limit {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Detection client backed by a remote HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpDetectionClient {
    client: reqwest::Client,
    max_response_bytes: usize,
}

impl HttpDetectionClient {
    pub fn new() -> Result<Self, DetectionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| DetectionError::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_response_bytes: MAX_RESPONSE_BYTES,
        }
    }

    pub fn with_max_response_bytes(mut self, max_response_bytes: usize) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }
}

#[async_trait]
impl DetectionClient for HttpDetectionClient {
    #[instrument(skip_all, fields(image = %image.id(), endpoint = %config.endpoint))]
    async fn detect(
        &self,
        image: &ImageHandle,
        config: &DetectConfig,
    ) -> Result<DetectionResult, DetectionError> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            DetectionError::Network(format!("Invalid endpoint {}: {}", config.endpoint, e))
        })?;
        let mut service = ServiceBuilder::new()
            .timeout(config.timeout)
            .service(HttpDetectionService::new(
                self.client.clone(),
                endpoint,
                self.max_response_bytes,
            ));

        let request = DetectRequest::for_image(image, config.confidence_floor);
        let outcome = match service.ready().await {
            Ok(ready) => ready.call(request).await,
            Err(e) => Err(e),
        };
        outcome.map_err(|e| {
            let error = unbox_error(e, config.timeout);
            warn!("Detection request failed: {}", error);
            error
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

fn unbox_error(error: BoxError, timeout: Duration) -> DetectionError {
    if error.is::<Elapsed>() {
        return DetectionError::Timeout(timeout);
    }
    match error.downcast::<DetectionError>() {
        Ok(error) => *error,
        Err(other) => DetectionError::Network(other.to_string()),
    }
}
