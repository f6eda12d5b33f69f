use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;

use crate::error::InputError;

const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A user-selected file before validation: name, declared media type, payload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Builds a file from in-memory bytes. An empty `media_type` (drag-and-drop
    /// on native platforms) falls back to the extension of `name`.
    pub fn from_bytes(name: impl Into<String>, media_type: &str, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let media_type = if media_type.trim().is_empty() {
            media_type_for(Path::new(&name)).to_string()
        } else {
            media_type.to_string()
        };
        Self::new(name, media_type, bytes)
    }

    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let bytes = std::fs::read(path).map_err(|source| InputError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type_for(path), bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn media_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}
