//! Note service - create, list per customer, and creator-only update.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{rules, Note, NoteDetail, UserSummary};
use crate::errors::{AppError, AppResult};
use crate::infra::{CustomerRepository, NoteRepository, UserRepository};

/// All notes for one customer, newest first, with the customer's name
/// denormalized for the response.
#[derive(Debug)]
pub struct CustomerNotes {
    pub customer_id: Uuid,
    pub customer_name: String,
    pub notes: Vec<(Note, Option<UserSummary>)>,
}

/// Note service trait for dependency injection.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Attach a note to a live customer, attributed to the caller.
    async fn create(&self, customer_id: Uuid, author_id: Uuid, content: &str)
        -> AppResult<NoteDetail>;

    /// List a live customer's notes, newest first.
    async fn list_for_customer(&self, customer_id: Uuid) -> AppResult<CustomerNotes>;

    /// Update a note's content. Only the original creator may edit; there
    /// is no admin override on this rule.
    async fn update(&self, note_id: Uuid, caller_id: Uuid, content: &str) -> AppResult<NoteDetail>;
}

/// Concrete implementation of [`NoteService`].
pub struct NoteManager {
    notes: Arc<dyn NoteRepository>,
    customers: Arc<dyn CustomerRepository>,
    users: Arc<dyn UserRepository>,
}

impl NoteManager {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        customers: Arc<dyn CustomerRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            notes,
            customers,
            users,
        }
    }

    /// Join creator and customer summaries onto a stored note.
    async fn detail(&self, note: Note) -> AppResult<NoteDetail> {
        let created_by_user = self
            .users
            .find_by_id(note.created_by_user_id)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| AppError::internal("Note creator does not exist"))?;

        let customer = self
            .customers
            .find_summary(note.customer_id)
            .await?
            .ok_or_else(|| AppError::internal("Note customer does not exist"))?;

        Ok(NoteDetail {
            note,
            created_by_user,
            customer,
        })
    }
}

#[async_trait]
impl NoteService for NoteManager {
    async fn create(
        &self,
        customer_id: Uuid,
        author_id: Uuid,
        content: &str,
    ) -> AppResult<NoteDetail> {
        let content = rules::note_content(content)?;

        // Target must exist and be live; soft-deleted customers reject
        // new notes
        self.customers
            .find_active_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        let note = self.notes.create(customer_id, author_id, content).await?;
        tracing::info!(note_id = %note.id, customer_id = %customer_id, "note created");
        self.detail(note).await
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> AppResult<CustomerNotes> {
        let customer = self
            .customers
            .find_active_by_id(customer_id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        let notes = self.notes.list_for_customer(customer_id).await?;

        Ok(CustomerNotes {
            customer_id,
            customer_name: customer.customer.name,
            notes,
        })
    }

    async fn update(
        &self,
        note_id: Uuid,
        caller_id: Uuid,
        content: &str,
    ) -> AppResult<NoteDetail> {
        let content = rules::note_content(content)?;

        let note = self
            .notes
            .find_by_id(note_id)
            .await?
            .ok_or_else(|| AppError::not_found("Note"))?;

        if !note.is_created_by(caller_id) {
            return Err(AppError::forbidden("You can only edit your own notes"));
        }

        let note = self.notes.update_content(note_id, content).await?;
        self.detail(note).await
    }
}
