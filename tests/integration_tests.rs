//! Integration tests for the packing list pipeline
//!
//! Exercises the pipeline end to end through the library API and the HTTP
//! boundary, with backend and renderer stand-ins. No network, no real PDF
//! reader; only the crate's own contracts.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use tower::ServiceExt;

use packliste::api;
use packliste::config::GenerationConfig;
use packliste::export::{DocumentExporter, DocumentRenderer};
use packliste::generation::{BackendError, GenerationBackend};
use packliste::pipeline::PackingListService;
use packliste::profile::{DateMode, TripProfileInput};
use packliste::{PacklisteError, Result};

const SAMPLE_LIST: &str = "Kleidung:\n- T-Shirts\n- Hose\n\nTechnik:\n- Ladekabel";

/// Backend stand-in returning a fixed list and counting invocations
struct StubBackend {
    text: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate(&self, _prompt: &str) -> std::result::Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.to_string())
    }
}

/// Backend stand-in that always fails authentication
struct AuthFailingBackend {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl GenerationBackend for AuthFailingBackend {
    async fn generate(&self, _prompt: &str) -> std::result::Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::Auth {
            message: "Incorrect API key provided".to_string(),
        })
    }
}

/// Renderer stand-in recording the paragraph lines it was handed
struct RecordingRenderer {
    seen: Arc<Mutex<Vec<String>>>,
    renders: Arc<AtomicUsize>,
}

impl DocumentRenderer for RecordingRenderer {
    fn render(&self, lines: &[String]) -> Result<Vec<u8>> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        *self.seen.lock().unwrap() = lines.to_vec();
        Ok(b"%PDF-stub".to_vec())
    }
}

fn stub_service(text: &'static str) -> (Arc<PackingListService>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = Arc::new(StubBackend {
        text,
        calls: calls.clone(),
    });
    let service = Arc::new(PackingListService::new(backend, DocumentExporter::default()));
    (service, calls)
}

fn valid_input() -> TripProfileInput {
    TripProfileInput {
        destination: "Barcelona".to_string(),
        date_mode: DateMode::ExplicitRange,
        start_date: NaiveDate::from_ymd_opt(2024, 7, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 7, 8),
        month: None,
        duration_days: None,
        adults: 2,
        children: 1,
        infants: 0,
        pets: 0,
        trip_type: packliste::TripType::Beach,
        accommodation: packliste::Accommodation::Hotel,
        transport: packliste::Transport::Plane,
        activities: vec![packliste::Activity::Swimming],
        special_notes: String::new(),
    }
}

/// Test the happy path from raw input to a downloadable artifact
#[tokio::test]
async fn test_valid_trip_produces_list_and_artifact() {
    let (service, calls) = stub_service(SAMPLE_LIST);

    let profile = valid_input().validate().unwrap();
    let result = service.generate(&profile).await.unwrap();
    assert_eq!(result.text, SAMPLE_LIST);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let artifact = service
        .export(
            &result.text,
            &profile.destination,
            profile.dates.explicit_start(),
        )
        .unwrap();
    assert_eq!(artifact.file_name, "Packliste_Barcelona_2024-07-01.pdf");
    assert!(artifact.bytes.starts_with(b"%PDF"));
}

/// Test that an invalid date range fails validation and the backend is
/// never invoked
#[tokio::test]
async fn test_invalid_dates_never_reach_backend() {
    let (service, calls) = stub_service(SAMPLE_LIST);

    let mut input = valid_input();
    input.start_date = NaiveDate::from_ymd_opt(2024, 7, 8);
    input.end_date = NaiveDate::from_ymd_opt(2024, 7, 1);

    let err = input.validate().unwrap_err();
    match err {
        PacklisteError::Validation { violations } => {
            assert!(violations.iter().any(|v| v.contains("Enddatum")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // validation short-circuits; nothing was generated
    drop(service);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Test that the exported document receives the exact line sequence,
/// including the blank separator
#[tokio::test]
async fn test_export_preserves_backend_formatting() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let renders = Arc::new(AtomicUsize::new(0));
    let exporter = DocumentExporter::new(Box::new(RecordingRenderer {
        seen: seen.clone(),
        renders: renders.clone(),
    }));
    let (backend_calls, backend) = {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            calls.clone(),
            Arc::new(StubBackend {
                text: SAMPLE_LIST,
                calls,
            }),
        )
    };
    let service = PackingListService::new(backend, exporter);

    let profile = valid_input().validate().unwrap();
    let result = service.generate(&profile).await.unwrap();
    service
        .export(&result.text, &profile.destination, profile.dates.explicit_start())
        .unwrap();

    assert_eq!(backend_calls.load(Ordering::SeqCst), 1);
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "Kleidung:".to_string(),
            "- T-Shirts".to_string(),
            "- Hose".to_string(),
            String::new(),
            "Technik:".to_string(),
            "- Ladekabel".to_string(),
        ]
    );
}

/// Test that an authentication fault surfaces as a backend error and no
/// artifact is produced
#[tokio::test]
async fn test_auth_fault_yields_backend_error_and_no_artifact() {
    let calls = Arc::new(AtomicUsize::new(0));
    let renders = Arc::new(AtomicUsize::new(0));
    let exporter = DocumentExporter::new(Box::new(RecordingRenderer {
        seen: Arc::new(Mutex::new(Vec::new())),
        renders: renders.clone(),
    }));
    let service = PackingListService::new(
        Arc::new(AuthFailingBackend {
            calls: calls.clone(),
        }),
        exporter,
    );

    let profile = valid_input().validate().unwrap();
    let err = service.generate(&profile).await.unwrap_err();

    assert!(matches!(err, PacklisteError::Backend { .. }));
    assert!(err.to_string().contains("Incorrect API key provided"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(renders.load(Ordering::SeqCst), 0);
}

/// Test that unresolved credentials fail startup before any backend exists
#[test]
fn test_missing_credential_blocks_startup() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = StubBackend {
        text: SAMPLE_LIST,
        calls: calls.clone(),
    };

    let mut generation = GenerationConfig::default();
    generation.api_key_env = "PACKLISTE_ITEST_KEY_UNSET".to_string();
    generation.secrets_file = PathBuf::from("/nonexistent/secrets.toml");

    let err = generation.resolve_api_key().unwrap_err();
    assert!(matches!(err, PacklisteError::Credentials { .. }));

    // startup aborts here, so no service is ever constructed around the
    // backend and nothing can reach it
    drop(backend);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Test the generation endpoint end to end
#[tokio::test]
async fn test_api_generates_packing_list() {
    let (service, calls) = stub_service(SAMPLE_LIST);

    let payload = serde_json::json!({
        "destination": "Barcelona",
        "date_mode": "explicit_range",
        "start_date": "2024-07-01",
        "end_date": "2024-07-08",
        "adults": 2,
        "children": 1,
        "infants": 0,
        "pets": 0,
        "trip_type": "Strand",
        "accommodation": "Hotel",
        "transport": "Flugzeug",
        "activities": ["Schwimmen", "Sightseeing"],
        "special_notes": "Allergie gegen Nüsse"
    });

    let response = api::router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packliste")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["text"], SAMPLE_LIST);
    assert_eq!(body["file_name"], "Packliste_Barcelona_2024-07-01.pdf");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Test that the generation endpoint reports every violation at once and
/// never contacts the backend
#[tokio::test]
async fn test_api_rejects_invalid_input_with_all_violations() {
    let (service, calls) = stub_service(SAMPLE_LIST);

    let payload = serde_json::json!({
        "destination": "   ",
        "date_mode": "explicit_range",
        "start_date": "2024-07-08",
        "end_date": "2024-07-01",
        "adults": 0,
        "trip_type": "Stadt",
        "accommodation": "Hotel",
        "transport": "Zug"
    });

    let response = api::router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packliste")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let violations = body["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// Test that a failing backend maps to 502 with the German user message
#[tokio::test]
async fn test_api_maps_backend_fault_to_bad_gateway() {
    let calls = Arc::new(AtomicUsize::new(0));
    let service = Arc::new(PackingListService::new(
        Arc::new(AuthFailingBackend {
            calls: calls.clone(),
        }),
        DocumentExporter::default(),
    ));

    let payload = serde_json::json!({
        "destination": "Barcelona",
        "date_mode": "explicit_range",
        "start_date": "2024-07-01",
        "end_date": "2024-07-08",
        "adults": 1,
        "trip_type": "Strand",
        "accommodation": "Hotel",
        "transport": "Flugzeug"
    });

    let response = api::router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packliste")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Fehler bei der Packlistenerstellung"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

/// Test the PDF download endpoint headers and payload
#[tokio::test]
async fn test_api_streams_pdf_download() {
    let (service, _calls) = stub_service(SAMPLE_LIST);

    let payload = serde_json::json!({
        "text": SAMPLE_LIST,
        "destination": "Barcelona",
        "start_date": "2024-07-01"
    });

    let response = api::router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packliste/pdf")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Packliste_Barcelona_2024-07-01.pdf\""
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

/// Test month mode through the HTTP boundary, with today's date in the
/// download name
#[tokio::test]
async fn test_api_month_mode_uses_current_date_for_file_name() {
    let (service, _calls) = stub_service(SAMPLE_LIST);

    let payload = serde_json::json!({
        "destination": "Rom",
        "date_mode": "month_and_duration",
        "month": "Oktober",
        "duration_days": 10,
        "adults": 1,
        "trip_type": "Stadt",
        "accommodation": "Hotel",
        "transport": "Zug",
        "activities": ["Museen"]
    });

    let response = api::router(service)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/packliste")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    let today = chrono::Local::now().date_naive();
    assert_eq!(
        body["file_name"],
        format!("Packliste_Rom_{today}.pdf")
    );
}
