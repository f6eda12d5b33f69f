use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::detection::{DetectConfig, DetectionClient};
use crate::error::{DetectionError, ErrorInfo, SessionError};
use crate::intake::{ImageFile, ImageHandle, ImagePicker};
use crate::session::{SessionState, SessionStatus};

/// How an `analyze` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeOutcome {
    Completed,
    Failed,
    /// The image was cleared or replaced while the call was in flight; its
    /// result was dropped.
    Superseded,
}

// Tags an outstanding detect call with the image it was issued for.
#[derive(Debug)]
struct InFlightCall {
    call_id: Uuid,
    image_id: Uuid,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct SessionCore {
    state: SessionState,
    in_flight: Option<InFlightCall>,
}

impl SessionCore {
    fn cancel_in_flight(&mut self) {
        if let Some(call) = self.in_flight.take() {
            debug!("Cancelling detect call {} for image {}", call.call_id, call.image_id);
            call.cancel.cancel();
        }
    }
}

// Fails the session if `analyze` is dropped or unwinds between publishing
// `Processing` and writing its outcome.
struct CallGuard<'a> {
    session: &'a AnalysisSession,
    call_id: Uuid,
    armed: bool,
}

impl CallGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CallGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon(self.call_id);
        }
    }
}

struct SessionInner {
    id: Uuid,
    picker: ImagePicker,
    client: Arc<dyn DetectionClient>,
    config: DetectConfig,
    core: Mutex<SessionCore>,
    state_tx: watch::Sender<SessionState>,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        let core = self
            .core
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        core.cancel_in_flight();
        if let Some(image) = &core.state.image {
            self.picker.clear(image);
        }
        debug!("Session {} torn down", self.id);
    }
}

/// Upload -> analyze -> render state machine for one user session.
///
/// Cheap to clone; clones drive the same session. Every transition replaces
/// the whole `SessionState` and publishes it to subscribers. At most one
/// detect call is outstanding, and a call whose image has since been cleared
/// or replaced never writes its result.
#[derive(Clone)]
pub struct AnalysisSession {
    inner: Arc<SessionInner>,
}

impl AnalysisSession {
    pub fn new(picker: ImagePicker, client: Arc<dyn DetectionClient>, config: DetectConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        let id = Uuid::new_v4();
        info!("Starting analysis session {} with {} backend", id, client.name());
        Self {
            inner: Arc::new(SessionInner {
                id,
                picker,
                client,
                config,
                core: Mutex::new(SessionCore::default()),
                state_tx,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn picker(&self) -> &ImagePicker {
        &self.inner.picker
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Any state except a rejected file -> `Ready`. A rejected file leaves the
    /// state as it was, with the input error attached.
    pub fn set_image(&self, file: ImageFile) -> Result<(), SessionError> {
        let handle = match self.inner.picker.submit(file) {
            Ok(handle) => handle,
            Err(e) => {
                let mut core = self.lock();
                let next = core.state.with_error(ErrorInfo::from(&e));
                self.publish(&mut core, next);
                return Err(e.into());
            }
        };

        let mut core = self.lock();
        core.cancel_in_flight();
        if let Some(previous) = &core.state.image {
            self.inner.picker.clear(previous);
        }
        info!("Session {} ready with image {}", self.inner.id, handle.id());
        self.publish(&mut core, SessionState::ready(handle));
        Ok(())
    }

    /// Any state -> `Idle`.
    pub fn clear_image(&self) {
        let mut core = self.lock();
        core.cancel_in_flight();
        if let Some(image) = &core.state.image {
            self.inner.picker.clear(image);
        }
        info!("Session {} cleared", self.inner.id);
        self.publish(&mut core, SessionState::default());
    }

    /// `Ready | Failed -> Processing -> Completed | Failed`.
    pub async fn analyze(&self) -> Result<AnalyzeOutcome, SessionError> {
        let (image, call_id, cancel) = {
            let mut core = self.lock();
            let image = match (core.state.status, &core.state.image) {
                (SessionStatus::Processing, _) => {
                    warn!("Session {} rejected a second analyze call", self.inner.id);
                    return Err(SessionError::ConcurrentCall);
                }
                (status, Some(image)) if status.can_analyze() => image.clone(),
                (status, _) => {
                    debug!("Session {} cannot analyze while {:?}", self.inner.id, status);
                    return Err(SessionError::InvalidTransition {
                        operation: "analyze",
                        from: status,
                    });
                }
            };
            let call = InFlightCall {
                call_id: Uuid::new_v4(),
                image_id: image.id(),
                cancel: CancellationToken::new(),
            };
            let tag = (call.call_id, call.cancel.clone());
            core.in_flight = Some(call);
            let next = core.state.processing();
            self.publish(&mut core, next);
            (image, tag.0, tag.1)
        };

        let mut guard = CallGuard {
            session: self,
            call_id,
            armed: true,
        };

        info!("Analyzing image {} (call {})", image.id(), call_id);
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = self.inner.client.detect(&image, &self.inner.config) => Some(result),
        };

        let mut core = self.lock();
        guard.disarm();
        let current_image = core.state.image.as_ref().map(ImageHandle::id);
        let is_current = matches!(
            &core.in_flight,
            Some(call) if call.call_id == call_id && Some(call.image_id) == current_image
        );
        let Some(result) = outcome.filter(|_| is_current) else {
            debug!("Discarding result of superseded call {} for image {}", call_id, image.id());
            return Ok(AnalyzeOutcome::Superseded);
        };
        core.in_flight = None;

        match result {
            Ok(result) => {
                info!(
                    "Analysis of {} completed: {} detection(s) in {}ms",
                    image.id(),
                    result.detections.len(),
                    result.elapsed_millis()
                );
                let next = core.state.completed(result);
                self.publish(&mut core, next);
                Ok(AnalyzeOutcome::Completed)
            }
            Err(e) => {
                let info = ErrorInfo::from(&e);
                warn!("Analysis of {} failed ({:?}): {}", image.id(), info.kind, e);
                let next = core.state.failed(info);
                self.publish(&mut core, next);
                Ok(AnalyzeOutcome::Failed)
            }
        }
    }

    fn abandon(&self, call_id: Uuid) {
        let mut core = self.lock();
        if !matches!(&core.in_flight, Some(call) if call.call_id == call_id) {
            return;
        }
        core.in_flight = None;
        warn!(
            "Session {}: detect call {} ended without a result",
            self.inner.id, call_id
        );
        let next = core.state.failed(ErrorInfo::from(&DetectionError::Interrupted));
        self.publish(&mut core, next);
    }

    // Callers hold the core lock so published states keep transition order.
    fn publish(&self, core: &mut SessionCore, state: SessionState) {
        debug!(
            "Session {}: {:?} -> {:?}",
            self.inner.id, core.state.status, state.status
        );
        core.state = state.clone();
        self.inner.state_tx.send_replace(state);
    }

    fn lock(&self) -> MutexGuard<'_, SessionCore> {
        self.inner
            .core
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
