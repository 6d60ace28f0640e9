//! HTTP boundary for the packing list pipeline
//!
//! Two JSON endpoints: one generates the list text for a submitted trip
//! form, one turns already generated text into the downloadable PDF. The
//! pipeline service is passed in explicitly and shared via router state.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::post,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::PacklisteError;
use crate::export::{PDF_MIME_TYPE, derive_file_name};
use crate::pipeline::PackingListService;
use crate::profile::TripProfileInput;

/// Successful generation response
#[derive(Serialize, Deserialize)]
pub struct PackingListResponse {
    /// Generated list text, unmodified
    pub text: String,
    /// File name the PDF download will use
    pub file_name: String,
}

/// Request body for the PDF download endpoint
///
/// Carries the already generated text back, so a render problem never
/// triggers a second generation.
#[derive(Serialize, Deserialize)]
pub struct ExportRequest {
    pub text: String,
    pub destination: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Error payload returned for failed requests
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    /// User-facing message
    pub message: String,
    /// Individual violations for validation failures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

pub fn router(service: Arc<PackingListService>) -> Router {
    Router::new()
        .route("/packliste", post(generate_packing_list))
        .route("/packliste/pdf", post(download_packing_list))
        .with_state(service)
}

async fn generate_packing_list(
    State(service): State<Arc<PackingListService>>,
    Json(input): Json<TripProfileInput>,
) -> Result<Json<PackingListResponse>, (StatusCode, Json<ApiError>)> {
    let profile = input.validate().map_err(error_response)?;

    let result = service.generate(&profile).await.map_err(error_response)?;

    let file_name = derive_file_name(&profile.destination, profile.dates.explicit_start());
    Ok(Json(PackingListResponse {
        text: result.text,
        file_name,
    }))
}

async fn download_packing_list(
    State(service): State<Arc<PackingListService>>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let artifact = service
        .export(&request.text, request.destination.trim(), request.start_date)
        .map_err(error_response)?;

    let headers = [
        (header::CONTENT_TYPE, PDF_MIME_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.file_name),
        ),
    ];

    Ok((headers, artifact.bytes).into_response())
}

/// Map a pipeline error onto a status code and user-facing payload
fn error_response(err: PacklisteError) -> (StatusCode, Json<ApiError>) {
    let status = match &err {
        PacklisteError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        PacklisteError::Backend { .. } => StatusCode::BAD_GATEWAY,
        PacklisteError::Credentials { .. }
        | PacklisteError::Config { .. }
        | PacklisteError::Render { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let violations = match &err {
        PacklisteError::Validation { violations } => violations.clone(),
        _ => Vec::new(),
    };

    warn!("Request failed: {}", err);
    (
        status,
        Json(ApiError {
            message: err.user_message(),
            violations,
        }),
    )
}
