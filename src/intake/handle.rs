use std::sync::Arc;

use uuid::Uuid;

use crate::intake::DisplayLease;

/// A validated image selection. Clones share the payload and the display
/// lease; the lease is released by `ImagePicker::clear` or when the last
/// clone drops.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    id: Uuid,
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    dimensions: Option<(u32, u32)>,
    lease: Arc<DisplayLease>,
}

impl ImageHandle {
    pub(crate) fn new(
        id: Uuid,
        name: String,
        media_type: String,
        bytes: Arc<[u8]>,
        dimensions: Option<(u32, u32)>,
        lease: DisplayLease,
    ) -> Self {
        Self {
            id,
            name,
            media_type,
            bytes,
            dimensions,
            lease: Arc::new(lease),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn display_uri(&self) -> &str {
        self.lease.uri()
    }

    pub fn is_released(&self) -> bool {
        self.lease.is_released()
    }

    pub(crate) fn release(&self) {
        self.lease.release();
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
