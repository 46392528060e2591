use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::auth::require_api_key;
use crate::errors::AppError;
use crate::leads::intake::{self, LeadSubmission};
use crate::leads::store;
use crate::models::lead::{Lead, LeadState};
use crate::state::AppState;

/// POST /api/v1/leads
///
/// Public multipart endpoint: `first_name`, `last_name`, `email` text
/// fields and a `resume` file field.
pub async fn handle_create_lead(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let submission = parse_submission(multipart).await?;
    let lead = intake::submit(&state, submission).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/v1/leads
pub async fn handle_list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Lead>>, AppError> {
    require_api_key(&headers, &state.config.api_key)?;

    let leads = store::list_all(&state.db).await?;
    Ok(Json(leads))
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeadStateRequest {
    /// Defaults to REACHED_OUT when the caller omits the field.
    #[serde(default = "default_update_state")]
    pub state: LeadState,
}

fn default_update_state() -> LeadState {
    LeadState::ReachedOut
}

/// PATCH /api/v1/leads/:id/state
pub async fn handle_update_lead_state(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateLeadStateRequest>,
) -> Result<Json<Lead>, AppError> {
    require_api_key(&headers, &state.config.api_key)?;

    let lead = store::update_state(&state.db, id, req.state).await?;
    Ok(Json(lead))
}

async fn parse_submission(mut multipart: Multipart) -> Result<LeadSubmission, AppError> {
    let mut first_name = None;
    let mut last_name = None;
    let mut email = None;
    let mut filename = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("first_name") => first_name = Some(read_text(field).await?),
            Some("last_name") => last_name = Some(read_text(field).await?),
            Some("email") => email = Some(read_text(field).await?),
            Some("resume") => {
                filename = field.file_name().map(str::to_string);
                resume = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("failed to read resume upload: {e}"))
                })?);
            }
            _ => {} // unknown fields are ignored
        }
    }

    Ok(LeadSubmission {
        first_name: required(first_name, "first_name")?,
        last_name: required(last_name, "last_name")?,
        email: required(email, "email")?,
        filename: filename.unwrap_or_else(|| "resume".to_string()),
        resume: required(resume, "resume")?,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart field: {e}")))
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("missing required field '{name}'")))
}
