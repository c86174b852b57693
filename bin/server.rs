// Tuition Tracker - Web Server
// JSON API over one shared tracker

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuition_tracker::{
    csv_io, sample_data, AppSettings, ChartData, IdGenerator, ImportReport, MonthlyStats,
    NewStudent, NewTransaction, SettingChange, Student, StudentId, Tracker, TrackerConfig,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    tracker: Arc<Mutex<Tracker>>,
}

impl AppState {
    fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }

    /// A panicked handler leaves the tracker consistent (every mutation is a
    /// single push/replace), so a poisoned lock is still usable.
    fn tracker(&self) -> MutexGuard<'_, Tracker> {
        self.tracker.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: (),
            error: Some(message.to_string()),
        }),
    )
        .into_response()
}

/// Stats response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    total_collected: u64,
    total_transactions: usize,
    student_count: usize,
    reference_month: String,
    #[serde(flatten)]
    monthly: MonthlyStats,
}

/// Chart data plus the segments to draw (a single placeholder when empty)
#[derive(Serialize)]
struct ChartResponse {
    #[serde(flatten)]
    chart: ChartData,
    segments: Vec<tuition_tracker::stats::ChartSegment>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/students - All students in insertion order
async fn get_students(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker();
    Json(ApiResponse::ok(tracker.students().to_vec()))
}

/// POST /api/students - Add a student
async fn create_student(
    State(state): State<AppState>,
    Json(draft): Json<NewStudent>,
) -> Response {
    if draft.nis.trim().is_empty() || draft.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "nis and name are required");
    }

    let mut tracker = state.tracker();
    let student = tracker.add_student(draft).clone();
    (StatusCode::CREATED, Json(ApiResponse::ok(student))).into_response()
}

/// PUT /api/students/:id - Replace a student's fields, keeping class and
/// status when they are not sent
async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Json(draft): Json<NewStudent>,
) -> Response {
    if draft.nis.trim().is_empty() || draft.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "nis and name are required");
    }

    let mut tracker = state.tracker();

    let Some(existing) = tracker.student(id).cloned() else {
        return error_response(StatusCode::NOT_FOUND, "Student not found");
    };

    let student = Student {
        id,
        nis: draft.nis,
        name: draft.name,
        class: draft.class.unwrap_or(existing.class),
        status: draft.status.unwrap_or(existing.status),
    };

    tracker.edit_student(student.clone());
    Json(ApiResponse::ok(student)).into_response()
}

/// DELETE /api/students/:id - Remove a student; their payments stay
async fn delete_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Response {
    let mut tracker = state.tracker();

    match tracker.delete_student(id) {
        Some(student) => Json(ApiResponse::ok(student)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Student not found"),
    }
}

/// GET /api/transactions - Newest first
async fn get_transactions(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker();
    Json(ApiResponse::ok(tracker.transactions().to_vec()))
}

/// POST /api/transactions - Record a payment
async fn create_transaction(
    State(state): State<AppState>,
    Json(draft): Json<NewTransaction>,
) -> Response {
    let mut tracker = state.tracker();

    match tracker.add_transaction(draft) {
        Some(tx) => (StatusCode::CREATED, Json(ApiResponse::ok(tx.clone()))).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Student not found"),
    }
}

/// GET /api/stats - Dashboard figures
async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    let tracker = state.tracker();

    Json(ApiResponse::ok(StatsResponse {
        total_collected: tracker.total_collected(),
        total_transactions: tracker.total_transactions(),
        student_count: tracker.students().len(),
        reference_month: tracker.config().reference_month.clone(),
        monthly: tracker.monthly_stats(),
    }))
}

/// GET /api/chart - Breakdown by payment type
async fn get_chart(State(state): State<AppState>) -> impl IntoResponse {
    let chart = state.tracker().chart_data();
    let segments = chart.segments();

    Json(ApiResponse::ok(ChartResponse { chart, segments }))
}

/// POST /api/import - Body is the CSV file contents
async fn import_students(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let report: ImportReport = state.tracker().import_students(&body);
    Json(ApiResponse::ok(report))
}

/// GET /api/export - Transactions report as a CSV download
async fn export_transactions(State(state): State<AppState>) -> impl IntoResponse {
    let contents = state.tracker().export_transactions();
    let filename = csv_io::export_filename(chrono::Utc::now().date_naive());

    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        contents,
    )
}

/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(*state.tracker().settings()))
}

/// PUT /api/settings - Replace all settings
async fn put_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> impl IntoResponse {
    let mut tracker = state.tracker();
    tracker.replace_settings(settings);
    Json(ApiResponse::ok(*tracker.settings()))
}

/// PATCH /api/settings - Change one setting, e.g. `{"key":"darkMode","value":true}`
async fn patch_settings(
    State(state): State<AppState>,
    Json(change): Json<SettingChange>,
) -> impl IntoResponse {
    let mut tracker = state.tracker();
    tracker.update_settings(change);
    Json(ApiResponse::ok(*tracker.settings()))
}

// ============================================================================
// Main Server
// ============================================================================

fn app(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/students", get(get_students).post(create_student))
        .route("/students/:id", put(update_student).delete(delete_student))
        .route("/transactions", get(get_transactions).post(create_transaction))
        .route("/stats", get(get_stats))
        .route("/chart", get(get_chart))
        .route("/import", post(import_students))
        .route("/export", get(export_transactions))
        .route(
            "/settings",
            get(get_settings).put(put_settings).patch(patch_settings),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

fn load_tracker() -> Result<Tracker> {
    let config = match std::env::var("TUITION_CONFIG") {
        Ok(path) => TrackerConfig::load_from_file(&path)?,
        Err(_) => TrackerConfig::default(),
    };

    let mut tracker = sample_data::tracker(config, IdGenerator::clock());
    if let Ok(path) = std::env::var("TUITION_SETTINGS") {
        tracker.replace_settings(AppSettings::load_or_default(&path));
    }
    Ok(tracker)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("🌐 Tuition Tracker - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let tracker = load_tracker()?;
    info!(
        students = tracker.students().len(),
        transactions = tracker.transactions().len(),
        "sample class loaded"
    );

    let addr = std::env::var("TUITION_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/stats", addr);
    println!("\n   Press Ctrl+C to stop\n");

    if let Err(e) = axum::serve(listener, app(AppState::new(tracker))).await {
        warn!("server stopped: {}", e);
        return Err(e).context("Failed to start server");
    }

    Ok(())
}
