//! Customer service - create, list, get, update, soft delete, and assign.
//!
//! Format validation happens at the handler boundary; this layer owns the
//! store-dependent checks (duplicate email, assignee existence) and the
//! role-scoped filtering.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CustomerChanges, CustomerDetail, NewCustomer, Visibility};
use crate::errors::{AppError, AppResult};
use crate::infra::{CustomerRepository, UserRepository};

/// A page of customers plus the unfiltered total for the caller.
#[derive(Debug)]
pub struct CustomerPage {
    pub customers: Vec<CustomerDetail>,
    pub total: u64,
}

/// Customer service trait for dependency injection.
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// Create a customer. Duplicate emails yield Conflict; an unknown
    /// assignee yields BadRequest.
    async fn create(&self, input: NewCustomer) -> AppResult<CustomerDetail>;

    /// List customers visible to the caller, newest-created first.
    async fn list(&self, visibility: Visibility, page: u64, limit: u64)
        -> AppResult<CustomerPage>;

    /// Get a customer by ID. No ownership filter: any authenticated caller
    /// may fetch any live customer by ID (this asymmetry with `list` is
    /// the documented behavior of this API).
    async fn get(&self, id: Uuid) -> AppResult<CustomerDetail>;

    /// Apply a partial update; omitted fields stay untouched, an explicit
    /// null assignee unassigns.
    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<CustomerDetail>;

    /// Soft-delete a customer. Notes are left in place.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Set or clear the assignee (admin-gated at the handler).
    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<CustomerDetail>;
}

/// Concrete implementation of [`CustomerService`].
pub struct CustomerManager {
    customers: Arc<dyn CustomerRepository>,
    users: Arc<dyn UserRepository>,
}

impl CustomerManager {
    pub fn new(customers: Arc<dyn CustomerRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { customers, users }
    }

    async fn require_assignee_exists(&self, user_id: Uuid, message: &str) -> AppResult<()> {
        if self.users.exists(user_id).await? {
            Ok(())
        } else {
            Err(AppError::bad_request(message))
        }
    }
}

#[async_trait]
impl CustomerService for CustomerManager {
    async fn create(&self, input: NewCustomer) -> AppResult<CustomerDetail> {
        // Friendly pre-check. Two concurrent creates can both pass it; the
        // unique index on email is the real guarantee and a violation there
        // surfaces as a server error.
        if self.customers.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict("Customer with this email already exists"));
        }

        if let Some(user_id) = input.assigned_to_user_id {
            self.require_assignee_exists(user_id, "Invalid assignedToUserId")
                .await?;
        }

        let detail = self.customers.create(input).await?;
        tracing::info!(customer_id = %detail.customer.id, "customer created");
        Ok(detail)
    }

    async fn list(
        &self,
        visibility: Visibility,
        page: u64,
        limit: u64,
    ) -> AppResult<CustomerPage> {
        let skip = page.saturating_sub(1) * limit;
        let customers = self.customers.list(visibility, skip, limit).await?;
        let total = self.customers.count(visibility).await?;
        Ok(CustomerPage { customers, total })
    }

    async fn get(&self, id: Uuid) -> AppResult<CustomerDetail> {
        self.customers
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))
    }

    async fn update(&self, id: Uuid, changes: CustomerChanges) -> AppResult<CustomerDetail> {
        let existing = self
            .customers
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        // Uniqueness is re-checked only when the email actually changes
        if let Some(email) = &changes.email {
            if *email != existing.customer.email
                && self.customers.find_by_email(email).await?.is_some()
            {
                return Err(AppError::conflict("Customer with this email already exists"));
            }
        }

        if let Some(Some(user_id)) = changes.assigned_to_user_id {
            self.require_assignee_exists(user_id, "Invalid assignedToUserId")
                .await?;
        }

        self.customers.update(id, changes).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.customers.mark_deleted(id).await?;
        tracing::info!(customer_id = %id, "customer soft-deleted");
        Ok(())
    }

    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<CustomerDetail> {
        if let Some(user_id) = assignee {
            self.require_assignee_exists(user_id, "Invalid assignedToUserId: user not found")
                .await?;
        }

        // Existence check before the write so an absent customer is a 404,
        // not a silent no-op
        self.customers
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer"))?;

        let changes = CustomerChanges {
            assigned_to_user_id: Some(assignee),
            ..Default::default()
        };
        self.customers.update(id, changes).await
    }
}
