use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use prahari_ledger::{AnnotationField, Block, GrievanceHistory, LookupResult};
use prahari_sdk::{AnnotationReceipt, AuditReport, IntakeReceipt, IntakeRequest, Prahari};
use prahari_types::GrievanceId;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ServerError, ServerResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub prahari: Prahari,
}

impl AppState {
    pub fn new(prahari: Prahari) -> Self {
        Self { prahari }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct IntakeBody {
    pub grievance_id: Option<String>,
    /// Hex digest, `0x` prefix optional.
    pub content_hash: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotationBody {
    pub field: String,
    pub value: String,
}

fn parse_id(raw: &str) -> ServerResult<GrievanceId> {
    GrievanceId::parse(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

/// Decode without length checks; the ledger owns the 32-byte rule.
fn parse_hash(raw: &str) -> ServerResult<Vec<u8>> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits)
        .map_err(|e| ServerError::BadRequest(format!("invalid content_hash: {e}")))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn verify_handler(State(state): State<AppState>) -> ServerResult<Json<AuditReport>> {
    Ok(Json(state.prahari.audit_report().await?))
}

pub async fn blocks_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<Block>>> {
    Ok(Json(state.prahari.blocks()?))
}

/// Always 200; a miss is `{"found": false}`.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<LookupResult>> {
    let grievance_id = parse_id(&id)?;
    Ok(Json(state.prahari.lookup(&grievance_id).await?))
}

pub async fn history_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Json<GrievanceHistory>> {
    let grievance_id = parse_id(&id)?;
    Ok(Json(state.prahari.history(&grievance_id)?))
}

pub async fn intake_handler(
    State(state): State<AppState>,
    body: Result<Json<IntakeBody>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<IntakeReceipt>)> {
    let Json(body) = body?;
    let mut request = IntakeRequest::new(parse_hash(&body.content_hash)?);
    if let Some(id) = body.grievance_id.as_deref() {
        request = request.with_id(parse_id(id)?);
    }
    if let Some(status) = body.status {
        request = request.with_status(status);
    }

    let receipt = state.prahari.intake(request).await?;
    info!(
        grievance_id = %receipt.grievance_id(),
        block = receipt.block.index,
        mirrored = receipt.mirror.is_registered(),
        "grievance accepted"
    );
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn annotate_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AnnotationBody>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<AnnotationReceipt>)> {
    let grievance_id = parse_id(&id)?;
    let Json(body) = body?;
    let field: AnnotationField = body.field.parse().map_err(ServerError::BadRequest)?;
    let receipt = state.prahari.annotate(&grievance_id, field, &body.value)?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
