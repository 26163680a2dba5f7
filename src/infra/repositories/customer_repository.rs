//! Customer repository: trait for dependency injection plus the SeaORM store.
//!
//! Query methods that feed lists and counts always exclude soft-deleted
//! records and apply the caller's [`Visibility`]. The email lookup is the
//! exception: it searches every record, deleted or not, because the unique
//! index on email is global.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::{
    Customer, CustomerChanges, CustomerDetail, CustomerSummary, NewCustomer, UserSummary,
    Visibility,
};
use crate::errors::{AppError, AppResult};

use super::entities::{customer, user};

/// Data access for customers.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Find a live customer by ID, joined with its assignee summary.
    /// Soft-deleted customers are treated as absent.
    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<CustomerDetail>>;

    /// Find a customer by email, including soft-deleted records.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>>;

    /// The `{id, name, email}` projection joined onto notes. Ignores the
    /// soft-delete flag: an existing note keeps pointing at its customer.
    async fn find_summary(&self, id: Uuid) -> AppResult<Option<CustomerSummary>>;

    /// List live customers under the visibility filter, newest-created
    /// first, with offset/limit paging.
    async fn list(
        &self,
        visibility: Visibility,
        skip: u64,
        take: u64,
    ) -> AppResult<Vec<CustomerDetail>>;

    /// Count live customers under the visibility filter.
    async fn count(&self, visibility: Visibility) -> AppResult<u64>;

    /// Count live customers per status value under the visibility filter.
    async fn count_by_status(&self, visibility: Visibility) -> AppResult<Vec<(String, i64)>>;

    /// Insert a new customer and return it joined with its assignee.
    async fn create(&self, data: NewCustomer) -> AppResult<CustomerDetail>;

    /// Apply a partial update to a live customer. Fails with NotFound if
    /// the customer is absent or soft-deleted.
    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<CustomerDetail>;

    /// Flip the soft-delete flag on a live customer. Fails with NotFound
    /// if the customer is absent or already deleted.
    async fn mark_deleted(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation of [`CustomerRepository`].
pub struct CustomerStore {
    db: Arc<DatabaseConnection>,
}

impl CustomerStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Condition matching live customers visible to the caller.
    fn visible(visibility: Visibility) -> Condition {
        let condition = Condition::all().add(customer::Column::IsDeleted.eq(false));
        match visibility {
            Visibility::All => condition,
            Visibility::Assigned(user_id) => {
                condition.add(customer::Column::AssignedToUserId.eq(user_id))
            }
        }
    }

    /// Fetch the `{id, name, email}` assignee projection, if assigned.
    async fn assignee_summary(&self, user_id: Option<Uuid>) -> AppResult<Option<UserSummary>> {
        let Some(user_id) = user_id else {
            return Ok(None);
        };
        let model = user::Entity::find_by_id(user_id).one(self.db.as_ref()).await?;
        Ok(model.map(|u| UserSummary {
            id: u.id,
            name: u.name,
            email: u.email,
        }))
    }

    /// Fetch a live customer row for mutation.
    async fn active_model_by_id(&self, id: Uuid) -> AppResult<customer::Model> {
        customer::Entity::find_by_id(id)
            .filter(customer::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))
    }
}

fn detail_from(pair: (customer::Model, Option<user::Model>)) -> CustomerDetail {
    let (customer_model, assignee) = pair;
    CustomerDetail {
        customer: Customer::from(customer_model),
        assigned_to_user: assignee.map(|u| UserSummary {
            id: u.id,
            name: u.name,
            email: u.email,
        }),
    }
}

#[async_trait]
impl CustomerRepository for CustomerStore {
    async fn find_active_by_id(&self, id: Uuid) -> AppResult<Option<CustomerDetail>> {
        let result = customer::Entity::find_by_id(id)
            .filter(customer::Column::IsDeleted.eq(false))
            .find_also_related(user::Entity)
            .one(self.db.as_ref())
            .await?;

        Ok(result.map(detail_from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Customer>> {
        let result = customer::Entity::find()
            .filter(customer::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await?;
        Ok(result.map(Customer::from))
    }

    async fn find_summary(&self, id: Uuid) -> AppResult<Option<CustomerSummary>> {
        let result = customer::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(result.map(|c| CustomerSummary {
            id: c.id,
            name: c.name,
            email: c.email,
        }))
    }

    async fn list(
        &self,
        visibility: Visibility,
        skip: u64,
        take: u64,
    ) -> AppResult<Vec<CustomerDetail>> {
        let rows = customer::Entity::find()
            .find_also_related(user::Entity)
            .filter(Self::visible(visibility))
            .order_by_desc(customer::Column::CreatedAt)
            .offset(skip)
            .limit(take)
            .all(self.db.as_ref())
            .await?;

        Ok(rows.into_iter().map(detail_from).collect())
    }

    async fn count(&self, visibility: Visibility) -> AppResult<u64> {
        let total = customer::Entity::find()
            .filter(Self::visible(visibility))
            .count(self.db.as_ref())
            .await?;
        Ok(total)
    }

    async fn count_by_status(&self, visibility: Visibility) -> AppResult<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> = customer::Entity::find()
            .select_only()
            .column(customer::Column::Status)
            .column_as(customer::Column::Id.count(), "count")
            .filter(Self::visible(visibility))
            .group_by(customer::Column::Status)
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(rows)
    }

    async fn create(&self, data: NewCustomer) -> AppResult<CustomerDetail> {
        let now = Utc::now();
        let active_model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            email: Set(data.email),
            phone: Set(data.phone),
            company: Set(data.company),
            status: Set(data.status.as_str().to_string()),
            assigned_to_user_id: Set(data.assigned_to_user_id),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await?;
        let assigned_to_user = self.assignee_summary(model.assigned_to_user_id).await?;

        Ok(CustomerDetail {
            customer: Customer::from(model),
            assigned_to_user,
        })
    }

    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<CustomerDetail> {
        let model = self.active_model_by_id(id).await?;
        let mut active: customer::ActiveModel = model.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(company) = changes.company {
            active.company = Set(Some(company));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(assignee) = changes.assigned_to_user_id {
            active.assigned_to_user_id = Set(assignee);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(self.db.as_ref()).await?;
        let assigned_to_user = self.assignee_summary(model.assigned_to_user_id).await?;

        Ok(CustomerDetail {
            customer: Customer::from(model),
            assigned_to_user,
        })
    }

    async fn mark_deleted(&self, id: Uuid) -> AppResult<()> {
        let model = self.active_model_by_id(id).await?;
        let mut active: customer::ActiveModel = model.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());

        active.update(self.db.as_ref()).await?;
        Ok(())
    }
}
