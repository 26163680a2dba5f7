//! Note repository: trait for dependency injection plus the SeaORM store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::domain::{Note, UserSummary, Visibility};
use crate::errors::{AppError, AppResult};

use super::entities::{customer, note, user};

/// Data access for notes.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note attached to a customer, attributed to its creator.
    async fn create(
        &self,
        customer_id: Uuid,
        created_by_user_id: Uuid,
        content: String,
    ) -> AppResult<Note>;

    /// Find a note by ID.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Note>>;

    /// Replace a note's content. Fails with NotFound if the note is absent.
    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Note>;

    /// All notes for a customer, newest first, joined with creator summaries.
    async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Vec<(Note, Option<UserSummary>)>>;

    /// Count notes created since the cutoff whose customer is live and
    /// visible to the caller.
    async fn count_created_since(
        &self,
        cutoff: DateTime<Utc>,
        visibility: Visibility,
    ) -> AppResult<u64>;
}

/// SeaORM-backed implementation of [`NoteRepository`].
pub struct NoteStore {
    db: Arc<DatabaseConnection>,
}

impl NoteStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepository for NoteStore {
    async fn create(
        &self,
        customer_id: Uuid,
        created_by_user_id: Uuid,
        content: String,
    ) -> AppResult<Note> {
        let now = Utc::now();
        let active_model = note::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            created_by_user_id: Set(created_by_user_id),
            content: Set(content),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        Ok(Note::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Note>> {
        let result = note::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(Note::from))
    }

    async fn update_content(&self, id: Uuid, content: String) -> AppResult<Note> {
        let model = note::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Note"))?;

        let mut active: note::ActiveModel = model.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        Ok(Note::from(model))
    }

    async fn list_for_customer(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Vec<(Note, Option<UserSummary>)>> {
        let rows = note::Entity::find()
            .find_also_related(user::Entity)
            .filter(note::Column::CustomerId.eq(customer_id))
            .order_by_desc(note::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(note_model, creator)| {
                (
                    Note::from(note_model),
                    creator.map(|u| UserSummary {
                        id: u.id,
                        name: u.name,
                        email: u.email,
                    }),
                )
            })
            .collect())
    }

    async fn count_created_since(
        &self,
        cutoff: DateTime<Utc>,
        visibility: Visibility,
    ) -> AppResult<u64> {
        let mut query = note::Entity::find()
            .join(JoinType::InnerJoin, note::Relation::Customer.def())
            .filter(note::Column::CreatedAt.gte(cutoff))
            .filter(customer::Column::IsDeleted.eq(false));

        if let Visibility::Assigned(user_id) = visibility {
            query = query.filter(customer::Column::AssignedToUserId.eq(user_id));
        }

        let total = query.count(self.db.as_ref()).await?;
        Ok(total)
    }
}
