//! Page state and the transitions the UI is allowed to make.
//!
//! One `Page` owns the only copy of the state. Every mutation takes the lock,
//! and the lock is never held across the prediction round trip, so the phase
//! check in `analyze` is what keeps a second analysis from starting.
//!
//! Round trips to the prediction server run on their own task. The caller
//! only waits for it, so a caller that goes away (a closed browser tab, a
//! client timeout) cannot leave the page stuck in `Analyzing` or `Checking`.

use crate::i18n::Language;
use crate::intake::{ImageIntake, IntakeError, SelectedImage};
use crate::prediction::{Classifier, Prediction, PredictionError};
use crate::presentation::ResultView;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{instrument, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    ImageSelected,
    Analyzing,
    ResultShown,
    ErrorShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ServerUnreachable,
    RequestFailed,
    UnexpectedFailure,
    Busy,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ServerUnreachable => "server_unreachable",
            ErrorKind::RequestFailed => "request_failed",
            ErrorKind::UnexpectedFailure => "unexpected_failure",
            ErrorKind::Busy => "busy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiError {
    pub kind: ErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl From<&PredictionError> for UiError {
    fn from(err: &PredictionError) -> Self {
        let kind = match err {
            PredictionError::ServerUnreachable { .. } => ErrorKind::ServerUnreachable,
            PredictionError::RequestFailed { .. } => ErrorKind::RequestFailed,
            PredictionError::UnexpectedFailure(_) => ErrorKind::UnexpectedFailure,
            PredictionError::Busy => ErrorKind::Busy,
        };
        UiError {
            kind,
            message: err.user_message(),
            status: err.status(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
    #[error("No image has been selected")]
    NoImageSelected,
    #[error("The prediction server is offline")]
    ServerOffline,
    #[error("Invalid upload: {0}")]
    InvalidUpload(#[from] IntakeError),
}

#[derive(Debug)]
struct PageState {
    phase: Phase,
    server_status: ServerStatus,
    language: Language,
    intake: ImageIntake,
    outcome: Option<Prediction>,
    error: Option<UiError>,
}

impl PageState {
    fn discard(&mut self) {
        self.phase = Phase::Idle;
        self.intake.clear();
        self.outcome = None;
        self.error = None;
    }

    fn ensure_not_analyzing(&self) -> Result<(), TransitionError> {
        if self.phase == Phase::Analyzing {
            return Err(TransitionError::AnalysisInProgress);
        }
        Ok(())
    }

    fn can_analyze(&self) -> bool {
        self.intake.accepted().is_some()
            && self.phase != Phase::Analyzing
            && self.server_status != ServerStatus::Offline
    }

    fn settle(&mut self, result: Result<Prediction, PredictionError>) {
        match result {
            Ok(prediction) => {
                self.outcome = Some(prediction);
                self.phase = Phase::ResultShown;
            }
            Err(e) => {
                if matches!(e, PredictionError::ServerUnreachable { .. }) {
                    tracing::warn!("Prediction server unreachable, marking offline");
                    self.server_status = ServerStatus::Offline;
                }
                self.error = Some(UiError::from(&e));
                self.phase = Phase::ErrorShown;
            }
        }
    }

    fn snapshot(&self) -> PageSnapshot {
        self.snapshot_in(self.language)
    }

    fn snapshot_in(&self, language: Language) -> PageSnapshot {
        PageSnapshot {
            phase: self.phase,
            server_status: self.server_status,
            language,
            image: self.intake.accepted().map(ImageSummary::from),
            preview: self.intake.preview().map(str::to_string),
            drag_over: self.intake.is_drag_over(),
            result: self
                .outcome
                .as_ref()
                .map(|outcome| ResultView::new(outcome, language)),
            error: self.error.clone(),
            intake_error: self
                .intake
                .error()
                .map(|e| e.user_message(language).to_string()),
            max_upload_bytes: self.intake.max_bytes(),
            can_analyze: self.can_analyze(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSummary {
    pub mime_type: String,
    pub size: usize,
    pub file_name: Option<String>,
}

impl From<&SelectedImage> for ImageSummary {
    fn from(image: &SelectedImage) -> Self {
        Self {
            mime_type: image.mime_type.clone(),
            size: image.size(),
            file_name: image.file_name.clone(),
        }
    }
}

/// Read-only copy of the page handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub phase: Phase,
    pub server_status: ServerStatus,
    pub language: Language,
    pub image: Option<ImageSummary>,
    pub preview: Option<String>,
    pub drag_over: bool,
    pub result: Option<ResultView>,
    pub error: Option<UiError>,
    pub intake_error: Option<String>,
    pub max_upload_bytes: usize,
    pub can_analyze: bool,
}

pub struct Page<C: Classifier> {
    classifier: Arc<C>,
    state: Arc<Mutex<PageState>>,
}

impl<C: Classifier> Page<C> {
    pub fn new(classifier: Arc<C>, language: Language, max_upload_bytes: usize) -> Self {
        Self {
            classifier,
            state: Arc::new(Mutex::new(PageState {
                phase: Phase::Idle,
                server_status: ServerStatus::Checking,
                language,
                intake: ImageIntake::new(max_upload_bytes),
                outcome: None,
                error: None,
            })),
        }
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Same as `snapshot`, rendered in `language` without changing the page language.
    pub async fn snapshot_in(&self, language: Language) -> PageSnapshot {
        self.state.lock().await.snapshot_in(language)
    }

    pub async fn set_language(&self, language: Language) -> PageSnapshot {
        let mut state = self.state.lock().await;
        state.language = language;
        state.snapshot()
    }

    pub async fn drag_over(&self) -> PageSnapshot {
        let mut state = self.state.lock().await;
        state.intake.drag_over();
        state.snapshot()
    }

    pub async fn drag_leave(&self) -> PageSnapshot {
        let mut state = self.state.lock().await;
        state.intake.drag_leave();
        state.snapshot()
    }

    /// Offers a file to the upload control. Dropped files go through the same path.
    #[instrument(skip(self, candidate), fields(mime = %candidate.mime_type, size = candidate.size()))]
    pub async fn select_image(
        &self,
        candidate: SelectedImage,
    ) -> Result<PageSnapshot, TransitionError> {
        let mut state = self.state.lock().await;
        state.ensure_not_analyzing()?;

        if state.intake.drop(candidate).is_none() {
            let err = state
                .intake
                .error()
                .cloned()
                .map(TransitionError::InvalidUpload)
                .unwrap_or(TransitionError::NoImageSelected);
            return Err(err);
        }

        state.phase = Phase::ImageSelected;
        state.outcome = None;
        state.error = None;
        tracing::info!("Image selected");
        Ok(state.snapshot())
    }

    pub async fn clear_image(&self) -> Result<PageSnapshot, TransitionError> {
        let mut state = self.state.lock().await;
        state.ensure_not_analyzing()?;
        state.discard();
        Ok(state.snapshot())
    }

    pub async fn reset(&self) -> Result<PageSnapshot, TransitionError> {
        let mut state = self.state.lock().await;
        state.ensure_not_analyzing()?;
        state.discard();
        tracing::info!("Page reset");
        Ok(state.snapshot())
    }

    /// Runs one prediction for the selected image. Prediction failures are not
    /// errors here: they land in the snapshot as a `UiError`.
    #[instrument(skip(self))]
    pub async fn analyze(&self) -> Result<PageSnapshot, TransitionError> {
        let image = {
            let mut state = self.state.lock().await;
            state.ensure_not_analyzing()?;
            let image = state
                .intake
                .accepted()
                .cloned()
                .ok_or(TransitionError::NoImageSelected)?;
            if state.server_status == ServerStatus::Offline {
                return Err(TransitionError::ServerOffline);
            }
            state.phase = Phase::Analyzing;
            state.outcome = None;
            state.error = None;
            image
        };

        let classifier = self.classifier.clone();
        let state = self.state.clone();
        let round_trip = tokio::spawn(async move {
            let result = classifier.predict(image).await;
            let mut state = state.lock().await;
            state.settle(result);
            state.snapshot()
        }
        .in_current_span());

        match round_trip.await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                tracing::error!("Prediction task failed: {}", e);
                let mut state = self.state.lock().await;
                if state.phase == Phase::Analyzing {
                    state.settle(Err(PredictionError::UnexpectedFailure(e.to_string())));
                }
                Ok(state.snapshot())
            }
        }
    }

    /// Checks the prediction server and records the answer.
    #[instrument(skip(self))]
    pub async fn check_server_status(&self) -> ServerStatus {
        self.state.lock().await.server_status = ServerStatus::Checking;

        let classifier = self.classifier.clone();
        let state = self.state.clone();
        let health = tokio::spawn(async move {
            let status = if classifier.health_check().await {
                ServerStatus::Online
            } else {
                ServerStatus::Offline
            };
            state.lock().await.server_status = status;
            status
        }
        .in_current_span());

        match health.await {
            Ok(status) => {
                tracing::info!("Prediction server status: {:?}", status);
                status
            }
            Err(e) => {
                tracing::error!("Health check task failed: {}", e);
                let mut state = self.state.lock().await;
                if state.server_status == ServerStatus::Checking {
                    state.server_status = ServerStatus::Offline;
                }
                state.server_status
            }
        }
    }
}
