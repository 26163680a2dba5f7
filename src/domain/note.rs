//! Note domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CustomerSummary, UserSummary};

/// Freeform note attached to a customer, attributed to its creating user.
/// Notes are never deleted; only their content changes, and only the
/// creator may change it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_by_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Check whether the given user created this note.
    pub fn is_created_by(&self, user_id: Uuid) -> bool {
        self.created_by_user_id == user_id
    }
}

/// Note joined with creator and customer summaries, as returned by the
/// create and update operations.
#[derive(Debug, Clone)]
pub struct NoteDetail {
    pub note: Note,
    pub created_by_user: UserSummary,
    pub customer: CustomerSummary,
}

/// Note response body (camelCase wire format). The customer summary is
/// only present on create/update responses; per-customer listings omit it.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_by_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by_user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerSummary>,
}

impl From<NoteDetail> for NoteResponse {
    fn from(detail: NoteDetail) -> Self {
        let NoteDetail {
            note,
            created_by_user,
            customer,
        } = detail;
        Self {
            id: note.id,
            customer_id: note.customer_id,
            created_by_user_id: note.created_by_user_id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
            created_by_user: Some(created_by_user),
            customer: Some(customer),
        }
    }
}

impl From<(Note, Option<UserSummary>)> for NoteResponse {
    fn from((note, created_by_user): (Note, Option<UserSummary>)) -> Self {
        Self {
            id: note.id,
            customer_id: note.customer_id,
            created_by_user_id: note.created_by_user_id,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
            created_by_user,
            customer: None,
        }
    }
}
