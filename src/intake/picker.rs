use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::InputError;
use crate::intake::{DisplayRegistry, ImageFile, ImageHandle};

#[derive(Debug, Clone)]
pub struct UploadLimits {
    pub max_bytes: usize,
    pub accepted_media_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            accepted_media_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

/// Validates selected files and turns them into display-ready handles.
/// Purely local: nothing here touches the network.
#[derive(Debug, Clone)]
pub struct ImagePicker {
    limits: UploadLimits,
    registry: DisplayRegistry,
}

impl ImagePicker {
    pub fn new(limits: UploadLimits, registry: DisplayRegistry) -> Self {
        Self { limits, registry }
    }

    pub fn registry(&self) -> &DisplayRegistry {
        &self.registry
    }

    pub fn submit(&self, file: ImageFile) -> Result<ImageHandle, InputError> {
        if let Err(e) = self.validate(&file) {
            warn!("Rejected image '{}': {}", file.name, e);
            return Err(e);
        }

        let id = Uuid::new_v4();
        let media_type = file.media_type.to_ascii_lowercase();
        let extension = ImageFormat::from_mime_type(&media_type)
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or("img");
        let dimensions = probe_dimensions(&file.bytes);
        if dimensions.is_none() {
            debug!("Could not read dimensions of '{}'", file.name);
        }
        let lease = self.registry.acquire(id, extension);
        info!(
            "Accepted image '{}' ({}, {} bytes) as {}",
            file.name,
            media_type,
            file.len(),
            id
        );
        Ok(ImageHandle::new(
            id,
            file.name,
            media_type,
            file.bytes,
            dimensions,
            lease,
        ))
    }

    /// Releases the display reference. Safe to call on an already released handle.
    pub fn clear(&self, handle: &ImageHandle) {
        if handle.is_released() {
            debug!("Image {} already released", handle.id());
            return;
        }
        handle.release();
        debug!("Released image {}", handle.id());
    }

    fn validate(&self, file: &ImageFile) -> Result<(), InputError> {
        let media_type = file.media_type.to_ascii_lowercase();
        if !media_type.starts_with("image/") {
            return Err(InputError::NotAnImage {
                media_type: file.media_type.clone(),
            });
        }
        if !self
            .limits
            .accepted_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&media_type))
        {
            return Err(InputError::UnsupportedMediaType {
                media_type: file.media_type.clone(),
            });
        }
        if file.is_empty() {
            return Err(InputError::Empty);
        }
        if file.len() > self.limits.max_bytes {
            return Err(InputError::TooLarge {
                size: file.len(),
                limit: self.limits.max_bytes,
            });
        }
        Ok(())
    }
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
