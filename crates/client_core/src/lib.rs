use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::SubmissionId,
    protocol::{AnalysisResult, ErrorDetail, HealthResponse},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod attachment;
pub mod form;
pub mod payload;
pub mod render;

pub use attachment::{Attachment, AttachmentTracker};
pub use form::FormFields;
pub use payload::AnalysisPayload;

const ANALYZE_ENDPOINT: &str = "/api/analyze";
const HEALTH_ENDPOINT: &str = "/health";
/// Shown when a failing response carries no usable `detail`.
const GENERIC_SERVICE_FAILURE: &str = "Failed to analyze product";
const GENERIC_TRANSPORT_FAILURE: &str = "request could not be delivered";

/// Single source of truth for the submission workflow. Exactly one
/// variant is active at a time and only the controller transitions it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WorkflowState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl WorkflowState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowState::Submitting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            WorkflowState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Side effects of the workflow transitions, consumed by the presentation
/// layer (disable the submit control, show the busy/success/error notice).
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    SubmissionStarted,
    AnalysisReady(AnalysisResult),
    SubmissionFailed(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request never reached or returned from the network layer.
    #[error("{0}")]
    Transport(String),
    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Service { status: StatusCode, message: String },
    /// A 2xx response whose body does not match the analysis schema.
    #[error("malformed response")]
    MalformedResponse,
}

struct SubmissionState {
    workflow: WorkflowState,
    next_token: u64,
    active_token: Option<SubmissionId>,
}

/// Client-side submission controller for the analysis service.
///
/// Owns the workflow state machine: it refuses concurrent dispatch while
/// a submission is in flight, and matches every outcome to the
/// [`SubmissionId`] that issued it so a stale response can never clobber
/// newer state.
pub struct AnalysisClient {
    http: Client,
    api_base_url: String,
    inner: Mutex<SubmissionState>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl AnalysisClient {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            http: Client::new(),
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            inner: Mutex::new(SubmissionState {
                workflow: WorkflowState::Idle,
                next_token: 0,
                active_token: None,
            }),
            events,
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Runs one submission round trip. Returns `false` without issuing a
    /// request when a submission is already in flight; otherwise drives
    /// the workflow to Succeeded or Failed and returns `true`.
    pub async fn submit(&self, fields: &FormFields, attachment: Option<Attachment>) -> bool {
        let Some(token) = self.begin_submission().await else {
            debug!("submit ignored; a submission is already in flight");
            return false;
        };

        let payload = AnalysisPayload::build(fields, attachment);
        let outcome = self.dispatch(payload).await;
        self.finish_submission(token, outcome).await;
        true
    }

    pub async fn workflow_state(&self) -> WorkflowState {
        self.inner.lock().await.workflow.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// Probes `GET /health`. Does not touch the workflow state.
    pub async fn health_check(&self) -> Result<HealthResponse, SubmitError> {
        let response = self
            .http
            .get(format!("{}{HEALTH_ENDPOINT}", self.api_base_url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Service {
                status,
                message: format!("health check returned {status}"),
            });
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|_| SubmitError::MalformedResponse)
    }

    /// Enters Submitting, clearing any previous result or error, and
    /// mints the token the eventual outcome must present. None when a
    /// submission is already in flight.
    async fn begin_submission(&self) -> Option<SubmissionId> {
        let token = {
            let mut guard = self.inner.lock().await;
            if guard.workflow.is_submitting() {
                return None;
            }
            guard.next_token += 1;
            let token = SubmissionId(guard.next_token);
            guard.active_token = Some(token);
            guard.workflow = WorkflowState::Submitting;
            token
        };

        info!(token = token.0, "submission started");
        let _ = self.events.send(WorkflowEvent::SubmissionStarted);
        Some(token)
    }

    async fn dispatch(&self, payload: AnalysisPayload) -> Result<AnalysisResult, SubmitError> {
        let form = payload
            .into_form()
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let response = self
            .http
            .post(format!("{}{ANALYZE_ENDPOINT}", self.api_base_url))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorDetail>()
                .await
                .ok()
                .map(|body| body.detail)
                .filter(|detail| !detail.is_empty())
                .unwrap_or_else(|| GENERIC_SERVICE_FAILURE.to_string());
            return Err(SubmitError::Service { status, message });
        }

        response.json::<AnalysisResult>().await.map_err(|err| {
            debug!("analysis response did not match the expected schema: {err}");
            SubmitError::MalformedResponse
        })
    }

    /// Applies an outcome under the token guard: an outcome for anything
    /// but the active submission is stale and dropped on the floor.
    async fn finish_submission(
        &self,
        token: SubmissionId,
        outcome: Result<AnalysisResult, SubmitError>,
    ) {
        let event = {
            let mut guard = self.inner.lock().await;
            if guard.active_token != Some(token) {
                warn!(token = token.0, "dropping outcome of a stale submission");
                return;
            }
            guard.active_token = None;
            match outcome {
                Ok(result) => {
                    info!(token = token.0, "submission succeeded");
                    guard.workflow = WorkflowState::Succeeded(result.clone());
                    WorkflowEvent::AnalysisReady(result)
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(token = token.0, "submission failed: {message}");
                    guard.workflow = WorkflowState::Failed(message.clone());
                    WorkflowEvent::SubmissionFailed(message)
                }
            }
        };

        let _ = self.events.send(event);
    }
}

fn transport_error(err: reqwest::Error) -> SubmitError {
    let description = err.to_string();
    SubmitError::Transport(if description.is_empty() {
        GENERIC_TRANSPORT_FAILURE.to_string()
    } else {
        description
    })
}

/// Seam the presentation layer programs against; it receives plain values
/// and owns none of the workflow state.
#[async_trait]
pub trait AssistantHandle: Send + Sync {
    async fn submit(&self, fields: &FormFields, attachment: Option<Attachment>) -> bool;
    async fn workflow_state(&self) -> WorkflowState;
    async fn health_check(&self) -> Result<HealthResponse, SubmitError>;
    fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent>;
}

#[async_trait]
impl AssistantHandle for AnalysisClient {
    async fn submit(&self, fields: &FormFields, attachment: Option<Attachment>) -> bool {
        AnalysisClient::submit(self, fields, attachment).await
    }

    async fn workflow_state(&self) -> WorkflowState {
        AnalysisClient::workflow_state(self).await
    }

    async fn health_check(&self) -> Result<HealthResponse, SubmitError> {
        AnalysisClient::health_check(self).await
    }

    fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        AnalysisClient::subscribe_events(self)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
