// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod notify;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use cad_dispatch::{CallView, DutyLogView, IncidentView, Page, StatusView, TargetView, UnitView};
use cad_dispatch_api::{
    ApiError, AssignmentRequest, CreateCallRequest, CreateIncidentRequest, CreateStatusCodeRequest,
    CreateUnitRequest, ErrorResponse, ListQuery, MergeUnitsRequest, SetUnitStatusRequest,
};
use cad_dispatch_domain::{CadSettings, InactivityTimeouts, TargetKind};
use cad_dispatch_persistence::Persistence;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEventBroadcaster, live_events_handler};
use crate::notify::{Notifier, WebhookClient};

/// CAD Dispatch Server - unit and incident coordination over HTTP and WebSocket
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "CAD_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "CAD_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "CAD_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, env = "CAD_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// URL that receives a JSON POST for every dispatch event
    #[arg(long, env = "CAD_WEBHOOK_URL")]
    webhook_url: Option<String>,

    /// Seconds before a webhook delivery is abandoned
    #[arg(long, env = "CAD_WEBHOOK_TIMEOUT_SECS", default_value_t = 5)]
    webhook_timeout_secs: u64,

    /// Prefix for combined unit callsigns
    #[arg(long, env = "CAD_PAIRED_UNIT_SYMBOL", default_value = "1A")]
    paired_unit_symbol: String,

    /// Maximum simultaneous call assignments per unit (0 disables the cap)
    #[arg(long, env = "CAD_MAX_CALL_ASSIGNMENTS", default_value_t = 1)]
    max_call_assignments: u32,

    /// Maximum simultaneous incident assignments per unit (0 disables the cap)
    #[arg(long, env = "CAD_MAX_INCIDENT_ASSIGNMENTS", default_value_t = 1)]
    max_incident_assignments: u32,

    /// Minutes without an update before a call is listed as inactive
    #[arg(long, env = "CAD_CALL_INACTIVITY_MINUTES")]
    call_inactivity_minutes: Option<u32>,

    /// Minutes without an update before an incident is listed as inactive
    #[arg(long, env = "CAD_INCIDENT_INACTIVITY_MINUTES")]
    incident_inactivity_minutes: Option<u32>,

    /// Minutes without a status change before a unit is listed as inactive
    #[arg(long, env = "CAD_UNIT_INACTIVITY_MINUTES")]
    unit_inactivity_minutes: Option<u32>,
}

impl Args {
    fn settings(&self) -> CadSettings {
        CadSettings {
            paired_unit_symbol: self.paired_unit_symbol.clone(),
            max_call_assignments: Some(self.max_call_assignments).filter(|cap| *cap > 0),
            max_incident_assignments: Some(self.max_incident_assignments).filter(|cap| *cap > 0),
            inactivity: InactivityTimeouts {
                call_minutes: self.call_inactivity_minutes,
                incident_minutes: self.incident_inactivity_minutes,
                unit_minutes: self.unit_inactivity_minutes,
            },
        }
    }
}

/// Application state shared across handlers.
///
/// The persistence mutex is held for one transaction at a time and always
/// released before events are published.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    settings: Arc<CadSettings>,
    notifier: Notifier,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    code: String,
    message: String,
}

impl HttpError {
    fn invalid_input(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: String::from("INVALID_INPUT"),
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(rejection.body_text())
    }
}

/// Handler for PUT `/units/{id}/status`.
async fn handle_set_unit_status(
    AxumState(app_state): AxumState<AppState>,
    Path(unit_id): Path<String>,
    payload: Result<Json<SetUnitStatusRequest>, JsonRejection>,
) -> Result<Json<UnitView>, HttpError> {
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let result = cad_dispatch_api::set_unit_status(
        &mut persistence,
        &unit_id,
        req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.notifier.publish(&result.events);
    Ok(Json(result.response))
}

/// Handler for POST `/units/merge`.
async fn handle_merge_units(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<MergeUnitsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UnitView>), HttpError> {
    let Json(req) = payload?;
    info!(
        units = req.unit_ids.len(),
        acting_unit_id = %req.acting_unit_id,
        "Handling merge request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result = cad_dispatch_api::merge_units(
        &mut persistence,
        &app_state.settings,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.notifier.publish(&result.events);
    Ok((StatusCode::CREATED, Json(result.response)))
}

/// Handler for POST `/units/{id}/unmerge`.
async fn handle_unmerge_unit(
    AxumState(app_state): AxumState<AppState>,
    Path(combined_unit_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let result = cad_dispatch_api::unmerge_unit(
        &mut persistence,
        &combined_unit_id,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.notifier.publish(&result.events);
    Ok(StatusCode::NO_CONTENT)
}

async fn change_assignment(
    app_state: &AppState,
    kind: TargetKind,
    target_id: &str,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
    assign: bool,
) -> Result<Json<TargetView>, HttpError> {
    let Json(req) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let result = cad_dispatch_api::change_assignment(
        &mut persistence,
        &app_state.settings,
        kind,
        target_id,
        &req,
        assign,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.notifier.publish(&result.events);
    Ok(Json(result.response))
}

/// Handler for POST `/calls/{id}/assign`.
async fn handle_assign_call(
    AxumState(app_state): AxumState<AppState>,
    Path(call_id): Path<String>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<TargetView>, HttpError> {
    change_assignment(&app_state, TargetKind::Call, &call_id, payload, true).await
}

/// Handler for POST `/calls/{id}/unassign`.
async fn handle_unassign_call(
    AxumState(app_state): AxumState<AppState>,
    Path(call_id): Path<String>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<TargetView>, HttpError> {
    change_assignment(&app_state, TargetKind::Call, &call_id, payload, false).await
}

/// Handler for POST `/incidents/{id}/assign`.
async fn handle_assign_incident(
    AxumState(app_state): AxumState<AppState>,
    Path(incident_id): Path<String>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<TargetView>, HttpError> {
    change_assignment(
        &app_state,
        TargetKind::Incident,
        &incident_id,
        payload,
        true,
    )
    .await
}

/// Handler for POST `/incidents/{id}/unassign`.
async fn handle_unassign_incident(
    AxumState(app_state): AxumState<AppState>,
    Path(incident_id): Path<String>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<TargetView>, HttpError> {
    change_assignment(
        &app_state,
        TargetKind::Incident,
        &incident_id,
        payload,
        false,
    )
    .await
}

async fn end_target(
    app_state: &AppState,
    kind: TargetKind,
    target_id: &str,
) -> Result<Json<TargetView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let result =
        cad_dispatch_api::end_target(&mut persistence, kind, target_id, OffsetDateTime::now_utc())?;
    drop(persistence);

    app_state.notifier.publish(&result.events);
    Ok(Json(result.response))
}

/// Handler for POST `/calls/{id}/end`.
async fn handle_end_call(
    AxumState(app_state): AxumState<AppState>,
    Path(call_id): Path<String>,
) -> Result<Json<TargetView>, HttpError> {
    end_target(&app_state, TargetKind::Call, &call_id).await
}

/// Handler for POST `/incidents/{id}/end`.
async fn handle_end_incident(
    AxumState(app_state): AxumState<AppState>,
    Path(incident_id): Path<String>,
) -> Result<Json<TargetView>, HttpError> {
    end_target(&app_state, TargetKind::Incident, &incident_id).await
}

/// Handler for GET `/calls`.
async fn handle_list_calls(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<CallView>>, HttpError> {
    let Query(query) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page<CallView> = cad_dispatch_api::list_calls(
        &mut persistence,
        &app_state.settings,
        &query,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(page))
}

/// Handler for GET `/incidents`.
async fn handle_list_incidents(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<IncidentView>>, HttpError> {
    let Query(query) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page<IncidentView> = cad_dispatch_api::list_incidents(
        &mut persistence,
        &app_state.settings,
        &query,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(page))
}

/// Handler for GET `/units`.
async fn handle_list_units(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Page<UnitView>>, HttpError> {
    let Query(query) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page<UnitView> = cad_dispatch_api::list_units(
        &mut persistence,
        &app_state.settings,
        &query,
        OffsetDateTime::now_utc(),
    )?;
    Ok(Json(page))
}

/// Handler for GET `/units/{id}`.
async fn handle_get_unit(
    AxumState(app_state): AxumState<AppState>,
    Path(unit_id): Path<String>,
) -> Result<Json<UnitView>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let unit: UnitView = cad_dispatch_api::get_unit(&mut persistence, &unit_id)?;
    Ok(Json(unit))
}

/// Handler for GET `/units/{id}/duty-logs`.
async fn handle_list_duty_logs(
    AxumState(app_state): AxumState<AppState>,
    Path(unit_id): Path<String>,
) -> Result<Json<Vec<DutyLogView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cad_dispatch_api::list_duty_logs(
        &mut persistence,
        &unit_id,
    )?))
}

/// Handler for POST `/status-codes`.
async fn handle_create_status_code(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateStatusCodeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<StatusView>), HttpError> {
    let Json(req) = payload?;
    let mut persistence = app_state.persistence.lock().await;
    let status: StatusView = cad_dispatch_api::create_status_code(&mut persistence, req)?;
    Ok((StatusCode::CREATED, Json(status)))
}

/// Handler for GET `/status-codes`.
async fn handle_list_status_codes(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<StatusView>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cad_dispatch_api::list_status_codes(&mut persistence)?))
}

/// Handler for POST `/units`.
async fn handle_create_unit(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateUnitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UnitView>), HttpError> {
    let Json(req) = payload?;
    let mut persistence = app_state.persistence.lock().await;
    let unit: UnitView = cad_dispatch_api::create_unit(&mut persistence, &req)?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Handler for POST `/calls`.
async fn handle_create_call(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateCallRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CallView>), HttpError> {
    let Json(req) = payload?;
    let mut persistence = app_state.persistence.lock().await;
    let call: CallView =
        cad_dispatch_api::create_call(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(call)))
}

/// Handler for POST `/incidents`.
async fn handle_create_incident(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IncidentView>), HttpError> {
    let Json(req) = payload?;
    let mut persistence = app_state.persistence.lock().await;
    let incident: IncidentView =
        cad_dispatch_api::create_incident(&mut persistence, &req, OffsetDateTime::now_utc())?;
    Ok((StatusCode::CREATED, Json(incident)))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/units", get(handle_list_units).post(handle_create_unit))
        .route("/units/merge", post(handle_merge_units))
        .route("/units/{id}", get(handle_get_unit))
        .route("/units/{id}/status", put(handle_set_unit_status))
        .route("/units/{id}/unmerge", post(handle_unmerge_unit))
        .route("/units/{id}/duty-logs", get(handle_list_duty_logs))
        .route("/calls", get(handle_list_calls).post(handle_create_call))
        .route("/calls/{id}/assign", post(handle_assign_call))
        .route("/calls/{id}/unassign", post(handle_unassign_call))
        .route("/calls/{id}/end", post(handle_end_call))
        .route(
            "/incidents",
            get(handle_list_incidents).post(handle_create_incident),
        )
        .route("/incidents/{id}/assign", post(handle_assign_incident))
        .route("/incidents/{id}/unassign", post(handle_unassign_incident))
        .route("/incidents/{id}/end", post(handle_end_incident))
        .route(
            "/status-codes",
            get(handle_list_status_codes).post(handle_create_status_code),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    info!("Initializing CAD Dispatch Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let webhook: Option<WebhookClient> = match &args.webhook_url {
        Some(url) => {
            info!(url = %url, "Webhook notifications enabled");
            Some(WebhookClient::new(
                url.clone(),
                Duration::from_secs(args.webhook_timeout_secs),
            )?)
        }
        None => None,
    };

    let settings: CadSettings = args.settings();
    info!(
        paired_unit_symbol = %settings.paired_unit_symbol,
        max_call_assignments = ?settings.max_call_assignments,
        max_incident_assignments = ?settings.max_incident_assignments,
        "Loaded dispatch settings"
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        settings: Arc::new(settings),
        notifier: Notifier::new(Arc::new(LiveEventBroadcaster::new()), webhook),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
