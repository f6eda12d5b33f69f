use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct RegistryInner {
    live: HashSet<String>,
    revoked: Vec<String>,
}

/// Tracks display URIs handed out for selected images. Revoked URIs queue up
/// until the view layer drains them and evicts its cached textures.
#[derive(Debug, Clone, Default)]
pub struct DisplayRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl DisplayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, id: Uuid, extension: &str) -> DisplayLease {
        let uri = format!("bytes://lungscan/{}.{}", id, extension);
        self.lock().live.insert(uri.clone());
        debug!("Acquired display resource {}", uri);
        DisplayLease {
            uri,
            registry: self.clone(),
            released: AtomicBool::new(false),
        }
    }

    pub fn is_live(&self, uri: &str) -> bool {
        self.lock().live.contains(uri)
    }

    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Takes every URI revoked since the previous call.
    pub fn drain_revoked(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().revoked)
    }

    fn revoke(&self, uri: &str) {
        let mut inner = self.lock();
        if inner.live.remove(uri) {
            inner.revoked.push(uri.to_string());
            debug!("Revoked display resource {}", uri);
        } else {
            warn!("Display resource {} was not live", uri);
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // The set stays consistent across a panicking holder, so recover it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Revocable display reference. Released at most once, either explicitly or on drop.
#[derive(Debug)]
pub struct DisplayLease {
    uri: String,
    registry: DisplayRegistry,
    released: AtomicBool,
}

impl DisplayLease {
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }

    /// Idempotent.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.registry.revoke(&self.uri);
        }
    }
}

impl Drop for DisplayLease {
    fn drop(&mut self) {
        self.release();
    }
}
