use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

use anyhow::Context;
use anyhow::Error as AnyhowError;
use thiserror::Error;

use admin_core::{AdminShell, ControllerError, EntityController, NotifySink, TracingNotifier};
use backend_api::{BackendConfig, DataService, DataServiceError, RestDataService};
use models::{Appointment, Doctor, ModelError, Patient, Record};

pub mod config;

// Define the admin API error enum
#[derive(Debug, Error)]
pub enum RestApiError {
    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),
    #[error("Backend error: {0}")]
    Backend(#[from] DataServiceError),
    #[error("Row decoding error: {0}")]
    Model(#[from] ModelError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("General error: {0}")]
    GeneralError(String),
}

// Implement IntoResponse for RestApiError to convert it into an HTTP response
impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RestApiError::Controller(ControllerError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            RestApiError::Controller(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            RestApiError::Backend(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            RestApiError::Model(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            RestApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            RestApiError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("IO error: {}", e)),
            RestApiError::GeneralError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "status": "error",
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

type Shell = AdminShell<RestDataService, TracingNotifier>;

// Shared state for the Axum application
#[derive(Clone)]
struct AppState {
    shell: Arc<Mutex<Shell>>,
    rest_api_shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

/// Raw form submission: one string per schema field, exactly what the
/// dialog would post. Unknown keys are ignored by the controller.
type FormPayload = HashMap<String, String>;

#[derive(Debug, Deserialize)]
struct ListParams {
    search: Option<String>,
}

// Shared handler plumbing. Every request gets its own dialog session on
// the shared controller, so a failed submit abandons the draft instead of
// leaking it into the next request.

async fn list_rows<S: DataService, N: NotifySink>(
    controller: &mut EntityController<S, N>,
    params: ListParams,
) -> Result<Vec<Record>, RestApiError> {
    controller.refresh().await?;
    controller.set_search_term(params.search.unwrap_or_default());
    Ok(controller.filtered().cloned().collect())
}

async fn submit_new<S: DataService, N: NotifySink>(
    controller: &mut EntityController<S, N>,
    payload: FormPayload,
) -> Result<Json<Value>, RestApiError> {
    controller.open_create();
    for (field, value) in payload {
        controller.set_form_value(&field, value);
    }
    match controller.submit().await {
        Ok(_) => {
            let schema = controller.schema();
            Ok(Json(json!({
                "status": "success",
                "message": format!("{} {} successfully", schema.title, schema.create_verb_past),
            })))
        }
        Err(err) => {
            controller.cancel();
            Err(err.into())
        }
    }
}

async fn submit_existing<S: DataService, N: NotifySink>(
    controller: &mut EntityController<S, N>,
    id: &str,
    payload: FormPayload,
) -> Result<Json<Value>, RestApiError> {
    if controller.find(id).is_none() {
        // the list may be cold on the first request of a session
        controller.refresh().await?;
    }
    let record = controller
        .find(id)
        .cloned()
        .ok_or_else(|| RestApiError::NotFound(format!("no record with id {id}")))?;

    controller.open_edit(&record);
    for (field, value) in payload {
        controller.set_form_value(&field, value);
    }
    match controller.submit().await {
        Ok(_) => {
            let schema = controller.schema();
            Ok(Json(json!({
                "status": "success",
                "message": format!("{} updated successfully", schema.title),
            })))
        }
        Err(err) => {
            controller.cancel();
            Err(err.into())
        }
    }
}

async fn remove_row<S: DataService, N: NotifySink>(
    controller: &mut EntityController<S, N>,
    id: &str,
) -> Result<Json<Value>, RestApiError> {
    controller.remove(id).await?;
    let schema = controller.schema();
    Ok(Json(json!({
        "status": "success",
        "message": format!("{} deleted successfully", schema.title),
    })))
}

// Handlers for /api/v1/patients
async fn list_patients_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Patient>>, RestApiError> {
    let mut shell = state.shell.lock().await;
    let rows = list_rows(&mut shell.patients, params).await?;
    let patients = rows
        .iter()
        .map(Patient::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(patients))
}

async fn create_patient_handler(
    State(state): State<AppState>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_new(&mut shell.patients, payload).await
}

async fn update_patient_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_existing(&mut shell.patients, &id.to_string(), payload).await
}

async fn delete_patient_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    remove_row(&mut shell.patients, &id.to_string()).await
}

// Handlers for /api/v1/doctors
async fn list_doctors_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Doctor>>, RestApiError> {
    let mut shell = state.shell.lock().await;
    let rows = list_rows(&mut shell.doctors, params).await?;
    let doctors = rows
        .iter()
        .map(Doctor::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(doctors))
}

async fn create_doctor_handler(
    State(state): State<AppState>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_new(&mut shell.doctors, payload).await
}

async fn update_doctor_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_existing(&mut shell.doctors, &id.to_string(), payload).await
}

async fn delete_doctor_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    remove_row(&mut shell.doctors, &id.to_string()).await
}

// Handlers for /api/v1/appointments
async fn list_appointments_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Appointment>>, RestApiError> {
    let mut shell = state.shell.lock().await;
    let rows = list_rows(&mut shell.appointments, params).await?;
    let appointments = rows
        .iter()
        .map(Appointment::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(appointments))
}

async fn create_appointment_handler(
    State(state): State<AppState>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_new(&mut shell.appointments, payload).await
}

async fn update_appointment_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FormPayload>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    submit_existing(&mut shell.appointments, &id.to_string(), payload).await
}

async fn delete_appointment_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, RestApiError> {
    let mut shell = state.shell.lock().await;
    remove_row(&mut shell.appointments, &id.to_string()).await
}

// Handler for /api/v1/appointments/choices
async fn booking_choices_handler(
    State(state): State<AppState>,
) -> Result<Json<admin_core::BookingChoices>, RestApiError> {
    let shell = state.shell.lock().await;
    Ok(Json(shell.booking_choices().await?))
}

// Handler for /api/v1/dashboard
async fn dashboard_handler(
    State(state): State<AppState>,
) -> Result<Json<models::DashboardStats>, RestApiError> {
    let shell = state.shell.lock().await;
    Ok(Json(shell.stats().await?))
}

// Handler for the /api/v1/shutdown endpoint
async fn shutdown_handler(State(state): State<AppState>) -> Result<Json<Value>, RestApiError> {
    let mut tx_guard = state.rest_api_shutdown_tx.lock().await;
    if let Some(tx) = tx_guard.take() {
        let _ = tx.send(());
        Ok(Json(json!({
            "status": "success",
            "message": "Shutting down admin API server.",
        })))
    } else {
        Err(RestApiError::GeneralError(
            "Shutdown signal already sent or not available.".to_string(),
        ))
    }
}

// Handler for the /api/v1/health endpoint
async fn health_check_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "message": "Admin API is healthy" })),
    )
}

// Handler for the /api/v1/version endpoint
async fn version_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "version": env!("CARGO_PKG_VERSION"), "api_level": 1 })),
    )
}

fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_check_handler))
        .route("/api/v1/version", get(version_handler))
        .route("/api/v1/shutdown", get(shutdown_handler))
        .route("/api/v1/dashboard", get(dashboard_handler))
        .route(
            "/api/v1/patients",
            get(list_patients_handler).post(create_patient_handler),
        )
        .route(
            "/api/v1/patients/:id",
            put(update_patient_handler).delete(delete_patient_handler),
        )
        .route(
            "/api/v1/doctors",
            get(list_doctors_handler).post(create_doctor_handler),
        )
        .route(
            "/api/v1/doctors/:id",
            put(update_doctor_handler).delete(delete_doctor_handler),
        )
        .route(
            "/api/v1/appointments",
            get(list_appointments_handler).post(create_appointment_handler),
        )
        .route("/api/v1/appointments/choices", get(booking_choices_handler))
        .route(
            "/api/v1/appointments/:id",
            put(update_appointment_handler).delete(delete_appointment_handler),
        )
        .with_state(app_state)
}

// Main function to start the admin API server
pub async fn start_server(
    host: &str,
    port: u16,
    shutdown_rx: oneshot::Receiver<()>,
    backend: BackendConfig,
) -> Result<(), AnyhowError> {
    let service = Arc::new(RestDataService::new(backend));
    let shell = AdminShell::new(service, TracingNotifier);

    let app_state = AppState {
        shell: Arc::new(Mutex::new(shell)),
        rest_api_shutdown_tx: Arc::new(Mutex::new(None)),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = router(app_state.clone()).layer(cors);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid listen address")?;
    info!("Admin API server listening on {addr}");

    let (tx, rx_internal) = oneshot::channel();
    *app_state.rest_api_shutdown_tx.lock().await = Some(tx);

    let combined_shutdown_signal = async {
        tokio::select! {
            _ = shutdown_rx => {
                info!("Received external shutdown signal.");
            }
            _ = rx_internal => {
                info!("Received internal shutdown signal.");
            }
        }
    };

    let listener = TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind to address: {addr}"))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(combined_shutdown_signal)
        .await
        .context("Admin API server failed to start or run")?;

    info!("Admin API server stopped.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{router, AppState, RestApiError, Shell};
    use admin_core::{AdminShell, TracingNotifier};
    use axum::response::IntoResponse;
    use backend_api::{BackendConfig, RestDataService};
    use models::ValidationError;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn state() -> AppState {
        let service = Arc::new(RestDataService::new(BackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: "test".to_string(),
            access_token: None,
        }));
        let shell: Shell = AdminShell::new(service, TracingNotifier);
        AppState {
            shell: Arc::new(Mutex::new(shell)),
            rest_api_shutdown_tx: Arc::new(Mutex::new(None)),
        }
    }

    #[test]
    fn router_accepts_every_admin_route() {
        // panics on duplicate or conflicting route registrations
        let _ = router(state());
    }

    #[tokio::test]
    async fn validation_failures_map_to_bad_request() {
        let err = RestApiError::Controller(
            ValidationError::MissingRequired("full_name".to_string()).into(),
        );
        assert_eq!(err.into_response().status(), 400);
    }

    #[tokio::test]
    async fn missing_records_map_to_not_found() {
        let err = RestApiError::NotFound("no record with id 7".to_string());
        assert_eq!(err.into_response().status(), 404);
    }

    #[tokio::test]
    async fn backend_failures_map_to_bad_gateway() {
        let err = RestApiError::Backend(backend_api::DataServiceError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(err.into_response().status(), 502);
    }
}
