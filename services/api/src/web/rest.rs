//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use medilog_core::domain::{MedicalRecord, RecordDraft, ValidationError};
use medilog_core::ports::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_records_handler,
        get_record_handler,
        create_record_handler,
        update_record_handler,
        delete_record_handler,
        search_records_handler,
        health_handler,
    ),
    components(
        schemas(RecordResponse, RecordPayload, ErrorBody, MessageBody, HealthResponse)
    ),
    tags(
        (name = "Medilog API", description = "API endpoints for the medication record keeper.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A stored record as it appears on the wire. Field names are snake_case;
/// the browser client maps them to its camelCase local model.
#[derive(Serialize, ToSchema)]
pub struct RecordResponse {
    pub id: i64,
    pub medicine: String,
    pub dosage: String,
    pub duration: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub condition: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MedicalRecord> for RecordResponse {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            medicine: record.medicine,
            dosage: record.dosage,
            duration: record.duration,
            start_date: record.start_date,
            end_date: record.end_date,
            condition: record.condition,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// The client-supplied body for POST and PUT.
///
/// Every field is defaulted so that an absent field reaches validation and
/// comes back as a 400 with a named field, rather than a serde rejection.
#[derive(Deserialize, ToSchema)]
pub struct RecordPayload {
    #[serde(default)]
    pub medicine: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub condition: Option<String>,
}

impl RecordPayload {
    /// Validates the payload and converts it into a domain draft.
    /// An empty or whitespace-only `condition` normalizes to `None`.
    fn into_draft(self) -> Result<RecordDraft, ValidationError> {
        let start_date = self
            .start_date
            .ok_or(ValidationError::MissingField("start_date"))?;
        let end_date = self
            .end_date
            .ok_or(ValidationError::MissingField("end_date"))?;

        let draft = RecordDraft {
            medicine: self.medicine,
            dosage: self.dosage,
            duration: self.duration,
            start_date,
            end_date,
            condition: self.condition.filter(|c| !c.trim().is_empty()),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// The JSON body used for every error response.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

/// A plain confirmation message (used by DELETE).
#[derive(Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

/// The store liveness report returned by the health endpoint.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//=========================================================================================
// Error Mapping Helpers
//=========================================================================================

type ErrorReply = (StatusCode, Json<ErrorBody>);

fn reply_error(status: StatusCode, message: impl Into<String>) -> ErrorReply {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Maps a store failure to its HTTP reply. Unexpected store errors are logged
/// with their full detail and surfaced to the caller as the short context
/// message only.
fn store_error_reply(context: &str, err: StoreError) -> ErrorReply {
    match err {
        StoreError::NotFound(message) => reply_error(StatusCode::NOT_FOUND, message),
        StoreError::Unexpected(detail) => {
            error!("{}: {}", context, detail);
            reply_error(StatusCode::INTERNAL_SERVER_ERROR, context)
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List every record, newest medication course first.
#[utoipa::path(
    get,
    path = "/records",
    responses(
        (status = 200, description = "All records, ordered by start_date descending", body = [RecordResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_records_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ErrorReply> {
    let records = state
        .store
        .list_all()
        .await
        .map_err(|e| store_error_reply("Failed to list records", e))?;

    let body: Vec<RecordResponse> = records.into_iter().map(RecordResponse::from).collect();
    Ok(Json(body))
}

/// Fetch a single record by id.
#[utoipa::path(
    get,
    path = "/records/{id}",
    responses(
        (status = 200, description = "The record", body = RecordResponse),
        (status = 404, description = "No record with this id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("id" = i64, Path, description = "The record id")
    )
)]
pub async fn get_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ErrorReply> {
    let record = state
        .store
        .get_by_id(id)
        .await
        .map_err(|e| store_error_reply("Failed to fetch record", e))?;

    Ok(Json(RecordResponse::from(record)))
}

/// Create a new record.
#[utoipa::path(
    post,
    path = "/records",
    request_body = RecordPayload,
    responses(
        (status = 201, description = "Record created", body = RecordResponse),
        (status = 400, description = "Missing field or start_date after end_date", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_record_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordPayload>,
) -> Result<impl IntoResponse, ErrorReply> {
    let draft = payload
        .into_draft()
        .map_err(|e| reply_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let record = state
        .store
        .insert(draft)
        .await
        .map_err(|e| store_error_reply("Failed to create record", e))?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

/// Replace all six user fields of an existing record.
///
/// Returns the updated record rather than a bare confirmation, so both
/// backends answer PUT identically.
#[utoipa::path(
    put,
    path = "/records/{id}",
    request_body = RecordPayload,
    responses(
        (status = 200, description = "Record updated", body = RecordResponse),
        (status = 400, description = "Missing field or start_date after end_date", body = ErrorBody),
        (status = 404, description = "No record with this id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("id" = i64, Path, description = "The record id")
    )
)]
pub async fn update_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<RecordPayload>,
) -> Result<impl IntoResponse, ErrorReply> {
    let draft = payload
        .into_draft()
        .map_err(|e| reply_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let record = state
        .store
        .update(id, draft)
        .await
        .map_err(|e| store_error_reply("Failed to update record", e))?;

    Ok(Json(RecordResponse::from(record)))
}

/// Delete a record.
#[utoipa::path(
    delete,
    path = "/records/{id}",
    responses(
        (status = 200, description = "Record deleted", body = MessageBody),
        (status = 404, description = "No record with this id", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("id" = i64, Path, description = "The record id")
    )
)]
pub async fn delete_record_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ErrorReply> {
    state
        .store
        .delete(id)
        .await
        .map_err(|e| store_error_reply("Failed to delete record", e))?;

    Ok(Json(MessageBody {
        message: format!("Record {} deleted", id),
    }))
}

/// Case-insensitive substring search over medicine, dosage, condition,
/// and the text rendering of start_date.
#[utoipa::path(
    get,
    path = "/records/search/{term}",
    responses(
        (status = 200, description = "Matching records, ordered by start_date descending", body = [RecordResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    params(
        ("term" = String, Path, description = "The substring to search for")
    )
)]
pub async fn search_records_handler(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
) -> Result<impl IntoResponse, ErrorReply> {
    let records = state
        .store
        .search_by_term(&term)
        .await
        .map_err(|e| store_error_reply("Failed to search records", e))?;

    let body: Vec<RecordResponse> = records.into_iter().map(RecordResponse::from).collect();
    Ok(Json(body))
}

/// Report whether the store answers a liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database: "connected".to_string(),
                error: None,
            }),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error".to_string(),
                    database: "disconnected".to_string(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

//=========================================================================================
// Router
//=========================================================================================

/// Builds the REST router over the shared state. The binary layers CORS,
/// Swagger UI, and static file serving on top of this; the integration tests
/// drive it directly.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/records",
            get(list_records_handler).post(create_record_handler),
        )
        .route(
            "/records/{id}",
            get(get_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler),
        )
        .route("/records/search/{term}", get(search_records_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
