//! Note handlers: notes live under their customer for creation and
//! listing, and at a flat path for edits.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::NoteResponse;
use crate::errors::AppResult;

/// Note creation / update request. The whitespace-only case is trimmed
/// and rejected in the service so both paths share the check.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NoteContentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    #[schema(example = "Followed up by phone, interested in Q4 renewal")]
    pub content: String,
}

/// Single-note mutation response
#[derive(Debug, Serialize, ToSchema)]
pub struct NoteMessageResponse {
    pub message: String,
    pub note: NoteResponse,
}

/// A customer's full note history, newest first
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerNotesResponse {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub notes: Vec<NoteResponse>,
    pub total: usize,
}

/// Routes nested under `/customers/:id/notes`
pub fn customer_note_routes() -> Router<AppState> {
    Router::new().route("/", post(create_note).get(list_notes))
}

/// Routes mounted at `/notes`
pub fn note_routes() -> Router<AppState> {
    Router::new().route("/:noteId", put(update_note))
}

/// Add a note to a customer
#[utoipa::path(
    post,
    path = "/customers/{id}/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = NoteContentRequest,
    responses(
        (status = 201, description = "Note created", body = NoteMessageResponse),
        (status = 400, description = "Empty content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn create_note(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(customer_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NoteContentRequest>,
) -> AppResult<(StatusCode, Json<NoteMessageResponse>)> {
    let detail = state
        .note_service
        .create(customer_id, caller.id, &payload.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NoteMessageResponse {
            message: "Note created successfully".to_string(),
            note: NoteResponse::from(detail),
        }),
    ))
}

/// List a customer's notes
#[utoipa::path(
    get,
    path = "/customers/{id}/notes",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Note history", body = CustomerNotesResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(_caller): Extension<CurrentUser>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<CustomerNotesResponse>> {
    let history = state.note_service.list_for_customer(customer_id).await?;

    let notes: Vec<NoteResponse> = history.notes.into_iter().map(NoteResponse::from).collect();
    Ok(Json(CustomerNotesResponse {
        customer_id: history.customer_id,
        customer_name: history.customer_name,
        total: notes.len(),
        notes,
    }))
}

/// Edit a note (creator only)
#[utoipa::path(
    put,
    path = "/notes/{noteId}",
    tag = "Notes",
    security(("bearer_auth" = [])),
    params(("noteId" = Uuid, Path, description = "Note ID")),
    request_body = NoteContentRequest,
    responses(
        (status = 200, description = "Note updated", body = NoteMessageResponse),
        (status = 400, description = "Empty content"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not the note's creator"),
        (status = 404, description = "Note not found")
    )
)]
pub async fn update_note(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(note_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NoteContentRequest>,
) -> AppResult<Json<NoteMessageResponse>> {
    let detail = state
        .note_service
        .update(note_id, caller.id, &payload.content)
        .await?;

    Ok(Json(NoteMessageResponse {
        message: "Note updated successfully".to_string(),
        note: NoteResponse::from(detail),
    }))
}
