use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde_json::{json, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use shared_config::DeploymentMode;
use shared_gateway::PracticeClient;

use crate::error::ScheduleFillError;
use crate::models::{Candidate, SendStatus};
use crate::services::compose::compose_message;

/// How long the success banner stays up before clearing itself.
const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPhase {
    Previewing,
    Sending,
}

/// The single pending confirmation. At most one exists at a time for the
/// whole screen; per-client send status lives in the status map instead.
#[derive(Debug, Clone)]
pub struct PendingConfirmation {
    pub client_id: String,
    pub client_name: String,
    pub message: String,
    pub override_non_prod: bool,
    pub phase: ConfirmationPhase,
}

struct OutreachInner {
    gateway: Arc<PracticeClient>,
    mode: DeploymentMode,
    pending: Mutex<Option<PendingConfirmation>>,
    statuses: RwLock<HashMap<String, SendStatus>>,
    // Bumped whenever a client's banner state is replaced, so a stale
    // success auto-clear task cannot wipe a newer banner.
    epochs: RwLock<HashMap<String, u64>>,
}

/// Gates outreach sends behind review/edit/confirm, tracks per-client
/// in-flight/error/success status, and owns the success auto-clear timer.
#[derive(Clone)]
pub struct OutreachService {
    inner: Arc<OutreachInner>,
}

impl OutreachService {
    pub fn new(gateway: Arc<PracticeClient>, mode: DeploymentMode) -> Self {
        Self {
            inner: Arc::new(OutreachInner {
                gateway,
                mode,
                pending: Mutex::new(None),
                statuses: RwLock::new(HashMap::new()),
                epochs: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Open the confirmation step for a candidate: compose the message,
    /// seed the editable buffer, supersede any previous confirmation.
    pub async fn open(
        &self,
        candidate: &Candidate,
        override_non_prod: bool,
    ) -> Result<String, ScheduleFillError> {
        if override_non_prod && self.inner.mode.is_production() {
            warn!(
                client_id = %candidate.client_id,
                "override send requested in production; refusing"
            );
            return Err(ScheduleFillError::Validation(
                "override send is not available in production".to_string(),
            ));
        }

        let message = compose_message(candidate);

        let mut pending = self.inner.pending.lock().await;
        *pending = Some(PendingConfirmation {
            client_id: candidate.client_id.clone(),
            client_name: candidate.client_name.clone(),
            message: message.clone(),
            override_non_prod,
            phase: ConfirmationPhase::Previewing,
        });
        drop(pending);

        // A new open supersedes this client's stale banner state. In-flight
        // tracking is preserved so a still-resolving send keeps its guard.
        self.bump_epoch(&candidate.client_id).await;
        let mut statuses = self.inner.statuses.write().await;
        let status = statuses.entry(candidate.client_id.clone()).or_default();
        status.error = None;
        status.succeeded = false;

        Ok(message)
    }

    /// Replace the buffered message while previewing. No validation: empty
    /// messages are the transport's problem to reject.
    pub async fn edit(&self, client_id: &str, message: String) -> Result<(), ScheduleFillError> {
        let mut pending = self.inner.pending.lock().await;
        match pending.as_mut() {
            Some(p) if p.client_id == client_id && p.phase == ConfirmationPhase::Previewing => {
                p.message = message;
                Ok(())
            }
            _ => Err(ScheduleFillError::Validation(
                "no open confirmation for this client".to_string(),
            )),
        }
    }

    /// Discard the buffer and close the confirmation. No side effects.
    pub async fn cancel(&self, client_id: &str) -> Result<(), ScheduleFillError> {
        let mut pending = self.inner.pending.lock().await;
        match pending.as_ref() {
            Some(p) if p.client_id == client_id => {
                *pending = None;
                Ok(())
            }
            _ => Err(ScheduleFillError::Validation(
                "no open confirmation for this client".to_string(),
            )),
        }
    }

    /// Send the buffered message. On failure the confirmation returns to
    /// previewing with edits intact; the error is recorded per client and
    /// reported in the returned status, not as an Err.
    pub async fn confirm(&self, client_id: &str) -> Result<SendStatus, ScheduleFillError> {
        // A send already in flight for this client disables the trigger
        // silently rather than surfacing an error.
        if self.status(client_id).await.in_flight {
            debug!(%client_id, "send already in flight, ignoring confirm");
            return Ok(self.status(client_id).await);
        }

        let (message, override_non_prod) = {
            let mut pending = self.inner.pending.lock().await;
            match pending.as_mut() {
                Some(p)
                    if p.client_id == client_id && p.phase == ConfirmationPhase::Previewing =>
                {
                    p.phase = ConfirmationPhase::Sending;
                    (p.message.clone(), p.override_non_prod)
                }
                _ => {
                    return Err(ScheduleFillError::Validation(
                        "no open confirmation for this client".to_string(),
                    ))
                }
            }
        };

        self.set_in_flight(client_id, true).await;

        let body = if override_non_prod {
            json!({ "message": message, "overrideNonProd": true })
        } else {
            json!({ "message": message })
        };

        let result = self
            .inner
            .gateway
            .request::<Value>(Method::POST, &format!("/sms/client/{}", client_id), Some(body))
            .await;

        match result {
            Ok(_) => {
                debug!(%client_id, "outreach message sent");
                {
                    let mut pending = self.inner.pending.lock().await;
                    if matches!(pending.as_ref(), Some(p) if p.client_id == client_id) {
                        *pending = None;
                    }
                }
                let epoch = self.bump_epoch(client_id).await;
                {
                    let mut statuses = self.inner.statuses.write().await;
                    let status = statuses.entry(client_id.to_string()).or_default();
                    status.in_flight = false;
                    status.error = None;
                    status.succeeded = true;
                }

                let service = self.clone();
                let client_id = client_id.to_string();
                tokio::spawn(async move {
                    service.auto_clear_success(client_id, epoch).await;
                });
            }
            Err(err) => {
                warn!(%client_id, error = %err, "outreach send failed");
                {
                    let mut pending = self.inner.pending.lock().await;
                    if let Some(p) = pending.as_mut() {
                        if p.client_id == client_id {
                            // Keep the edited buffer so the user can retry.
                            p.phase = ConfirmationPhase::Previewing;
                        }
                    }
                }
                let mut statuses = self.inner.statuses.write().await;
                let status = statuses.entry(client_id.to_string()).or_default();
                status.in_flight = false;
                status.succeeded = false;
                status.error = Some(err.user_message());
            }
        }

        Ok(self.status(client_id).await)
    }

    pub async fn status(&self, client_id: &str) -> SendStatus {
        self.inner
            .statuses
            .read()
            .await
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn pending(&self) -> Option<PendingConfirmation> {
        self.inner.pending.lock().await.clone()
    }

    async fn auto_clear_success(self, client_id: String, epoch: u64) {
        tokio::time::sleep(SUCCESS_DISPLAY).await;

        let current = self.inner.epochs.read().await.get(&client_id).copied();
        if current != Some(epoch) {
            // Superseded by a newer open or send.
            return;
        }

        let mut statuses = self.inner.statuses.write().await;
        if let Some(status) = statuses.get_mut(&client_id) {
            status.succeeded = false;
        }
    }

    async fn set_in_flight(&self, client_id: &str, in_flight: bool) {
        let mut statuses = self.inner.statuses.write().await;
        statuses.entry(client_id.to_string()).or_default().in_flight = in_flight;
    }

    async fn bump_epoch(&self, client_id: &str) -> u64 {
        let mut epochs = self.inner.epochs.write().await;
        let epoch = epochs.entry(client_id.to_string()).or_insert(0);
        *epoch += 1;
        *epoch
    }
}
