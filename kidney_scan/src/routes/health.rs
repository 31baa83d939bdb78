use crate::{page::ServerStatus, server::SharedState};
use axum::{extract::State, response::IntoResponse, response::Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct Status {
    status: String,
    prediction_service: ServerStatus,
}

pub async fn healthcheck(State(state): State<SharedState>) -> impl IntoResponse {
    let snapshot = state.page.snapshot().await;
    Json(Status {
        status: "Available".into(),
        prediction_service: snapshot.server_status,
    })
}
