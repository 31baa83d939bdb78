use crate::config::PredictionServiceConfig;
use crate::intake::SelectedImage;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Cannot reach the prediction server at {base_url}: {reason}")]
    ServerUnreachable { base_url: String, reason: String },
    #[error("HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },
    #[error("Unexpected error during prediction: {0}")]
    UnexpectedFailure(String),
    #[error("A prediction is already in progress")]
    Busy,
}

impl PredictionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            PredictionError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PredictionError::ServerUnreachable { base_url, .. } => format!(
                "Cannot reach the server. Make sure the prediction service is running on {}",
                base_url
            ),
            PredictionError::RequestFailed { status, body } => {
                format!("HTTP {}: {}", status, body)
            }
            PredictionError::UnexpectedFailure(_) => {
                "Unexpected error occurred during prediction.".to_string()
            }
            PredictionError::Busy => {
                "An analysis is already running. Please wait for it to finish.".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Normal,
    Tumor,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Normal => "normal",
            Label::Tumor => "tumor",
        }
    }
}

impl TryFrom<&str> for Label {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "tumor" => Ok(Self::Tumor),
            other => Err(format!("unrecognized classification label `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub confidence: Option<f64>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    image: &'a str,
}

/// Reply shape of the classification service. `class_index` is sent too but unused.
#[derive(Deserialize)]
struct PredictResponse {
    class: String,
    #[serde(default)]
    confidence: Option<f64>,
}

impl TryFrom<PredictResponse> for Prediction {
    type Error = PredictionError;

    fn try_from(raw: PredictResponse) -> Result<Self, Self::Error> {
        let label = Label::try_from(raw.class.as_str()).map_err(PredictionError::UnexpectedFailure)?;

        if let Some(confidence) = raw.confidence {
            if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
                return Err(PredictionError::UnexpectedFailure(format!(
                    "confidence {} is outside [0, 1]",
                    confidence
                )));
            }
        }

        Ok(Prediction {
            label,
            confidence: raw.confidence,
        })
    }
}

/// Anything that can classify a scan and report whether it is reachable.
pub trait Classifier: Send + Sync + 'static {
    fn predict(
        &self,
        image: SelectedImage,
    ) -> impl Future<Output = Result<Prediction, PredictionError>> + Send;

    fn health_check(&self) -> impl Future<Output = bool> + Send;
}

pub struct PredictionClient {
    http: reqwest::Client,
    config: PredictionServiceConfig,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PredictionClient {
    pub fn new(config: &PredictionServiceConfig) -> Result<Self, PredictionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| PredictionError::UnexpectedFailure(e.to_string()))?;

        Ok(Self {
            http,
            config: config.clone(),
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>, PredictionError> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PredictionError::Busy)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn unreachable(&self, err: reqwest::Error) -> PredictionError {
        PredictionError::ServerUnreachable {
            base_url: self.config.base_url.clone(),
            reason: err.to_string(),
        }
    }

    #[instrument(skip(self, image), fields(size = image.size(), mime = %image.mime_type))]
    async fn send_predict(&self, image: &SelectedImage) -> Result<Prediction, PredictionError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);

        let response = self
            .http
            .post(self.config.get_predict_url())
            .json(&PredictRequest { image: &encoded })
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    PredictionError::UnexpectedFailure(e.to_string())
                } else {
                    self.unreachable(e)
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::UnexpectedFailure(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("Prediction service answered {}: {}", status, body);
            return Err(PredictionError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let raw: PredictResponse = serde_json::from_str(&body).map_err(|e| {
            PredictionError::UnexpectedFailure(format!("malformed response `{}`: {}", body, e))
        })?;

        Prediction::try_from(raw)
    }
}

impl Classifier for PredictionClient {
    async fn predict(&self, image: SelectedImage) -> Result<Prediction, PredictionError> {
        let _guard = self.acquire()?;

        let result = self.send_predict(&image).await;
        match &result {
            Ok(prediction) => tracing::info!(
                "Prediction received: {} ({:?})",
                prediction.label.as_str(),
                prediction.confidence
            ),
            Err(e) => tracing::error!("Prediction failed: {}", e),
        }
        result
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> bool {
        match self.http.get(self.config.get_health_url()).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering as AtomicOrdering},
        Arc,
    };
    use tokio::{net::TcpListener, sync::Notify};

    #[derive(Deserialize)]
    struct Received {
        image: String,
    }

    async fn spawn_backend(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn unused_address() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> PredictionClient {
        PredictionClient::new(&PredictionServiceConfig::with_base_url(base_url)).unwrap()
    }

    fn scan() -> SelectedImage {
        SelectedImage::new(vec![0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10], "image/jpeg")
    }

    fn json_backend(reply: serde_json::Value) -> Router {
        Router::new().route(
            "/predict",
            post(move |Json(body): Json<Received>| {
                let reply = reply.clone();
                async move {
                    assert_eq!(body.image, "/9j/4AAQ");
                    Json(reply)
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_predict_normal() {
        let base_url = spawn_backend(json_backend(
            serde_json::json!({"class": "Normal", "class_index": 0, "confidence": 0.91}),
        ))
        .await;

        let prediction = client_for(base_url).predict(scan()).await.unwrap();

        assert_eq!(prediction.label, Label::Normal);
        assert_eq!(prediction.confidence, Some(0.91));
    }

    #[tokio::test]
    async fn test_predict_tumor() {
        let base_url = spawn_backend(json_backend(
            serde_json::json!({"class": "Tumor", "confidence": 0.77}),
        ))
        .await;

        let prediction = client_for(base_url).predict(scan()).await.unwrap();

        assert_eq!(prediction.label, Label::Tumor);
        assert_eq!(prediction.confidence, Some(0.77));
    }

    #[tokio::test]
    async fn test_predict_server_error_is_request_failed() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model exploded") }),
        );
        let base_url = spawn_backend(router).await;

        let err = client_for(base_url).predict(scan()).await.unwrap_err();

        assert_eq!(
            err,
            PredictionError::RequestFailed {
                status: 500,
                body: "model exploded".into()
            }
        );
        assert_eq!(err.status(), Some(500));
        assert!(err.user_message().contains("model exploded"));
    }

    #[tokio::test]
    async fn test_predict_unreachable() {
        let err = client_for(unused_address().await)
            .predict(scan())
            .await
            .unwrap_err();

        assert!(matches!(err, PredictionError::ServerUnreachable { .. }));
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range_confidence() {
        let base_url = spawn_backend(json_backend(
            serde_json::json!({"class": "Normal", "confidence": 1.5}),
        ))
        .await;

        let err = client_for(base_url).predict(scan()).await.unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedFailure(_)));
    }

    #[tokio::test]
    async fn test_predict_rejects_unknown_label() {
        let base_url = spawn_backend(json_backend(
            serde_json::json!({"class": "Cyst", "confidence": 0.5}),
        ))
        .await;

        let err = client_for(base_url).predict(scan()).await.unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedFailure(_)));
    }

    #[tokio::test]
    async fn test_predict_rejects_non_json_success() {
        let router = Router::new().route("/predict", post(|| async { "all good" }));
        let base_url = spawn_backend(router).await;

        let err = client_for(base_url).predict(scan()).await.unwrap_err();
        assert!(matches!(err, PredictionError::UnexpectedFailure(_)));
    }

    #[tokio::test]
    async fn test_predict_without_confidence() {
        let base_url = spawn_backend(json_backend(serde_json::json!({"class": "TUMOR"}))).await;

        let prediction = client_for(base_url).predict(scan()).await.unwrap();
        assert_eq!(prediction.label, Label::Tumor);
        assert_eq!(prediction.confidence, None);
    }

    #[derive(Clone)]
    struct SlowBackend {
        hits: Arc<AtomicUsize>,
        release: Arc<Notify>,
    }

    #[tokio::test]
    async fn test_second_predict_while_in_flight_is_busy() {
        let backend = SlowBackend {
            hits: Arc::new(AtomicUsize::new(0)),
            release: Arc::new(Notify::new()),
        };
        let router = Router::new()
            .route(
                "/predict",
                post(|State(backend): State<SlowBackend>| async move {
                    backend.hits.fetch_add(1, AtomicOrdering::SeqCst);
                    backend.release.notified().await;
                    Json(serde_json::json!({"class": "Normal", "confidence": 0.6}))
                }),
            )
            .with_state(backend.clone());
        let base_url = spawn_backend(router).await;
        let client = Arc::new(client_for(base_url));

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.predict(scan()).await }
        });

        while backend.hits.load(AtomicOrdering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(client.is_busy());
        assert_eq!(client.predict(scan()).await, Err(PredictionError::Busy));

        backend.release.notify_one();
        let prediction = first.await.unwrap().unwrap();
        assert_eq!(prediction.label, Label::Normal);
        assert_eq!(backend.hits.load(AtomicOrdering::SeqCst), 1);
        assert!(!client.is_busy());
    }

    #[tokio::test]
    async fn test_health_check_any_success_status() {
        let router = Router::new().route("/", get(|| async { StatusCode::NO_CONTENT }));
        let base_url = spawn_backend(router).await;

        assert!(client_for(base_url).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_non_success_status() {
        let router = Router::new().route("/", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let base_url = spawn_backend(router).await;

        assert!(!client_for(base_url).health_check().await);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        assert!(!client_for(unused_address().await).health_check().await);
    }
}
