//! Customer domain entity, status enumeration, and input types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

use super::UserSummary;

/// Customer lifecycle status. Serialized with the variant name as-is
/// (`Lead`, `Prospect`, `Active`, `Inactive`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CustomerStatus {
    #[default]
    Lead,
    Prospect,
    Active,
    Inactive,
}

impl CustomerStatus {
    /// All valid status values, in display order.
    pub const ALL: [CustomerStatus; 4] = [
        CustomerStatus::Lead,
        CustomerStatus::Prospect,
        CustomerStatus::Active,
        CustomerStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Lead => "Lead",
            CustomerStatus::Prospect => "Prospect",
            CustomerStatus::Active => "Active",
            CustomerStatus::Inactive => "Inactive",
        }
    }

    /// Parse a status value, rejecting anything outside the fixed set.
    /// The error message echoes the valid values back to the caller.
    pub fn parse(value: &str) -> AppResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| {
                let valid = Self::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                AppError::bad_request(format!("Invalid status. Must be one of: {}", valid))
            })
    }
}

impl std::fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Customer domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: CustomerStatus,
    pub assigned_to_user_id: Option<Uuid>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer joined with its assignee summary, as returned by every
/// customer-facing operation.
#[derive(Debug, Clone)]
pub struct CustomerDetail {
    pub customer: Customer,
    pub assigned_to_user: Option<UserSummary>,
}

/// Compact customer projection joined onto notes (`{id, name, email}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&Customer> for CustomerSummary {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
        }
    }
}

/// Customer response body (camelCase wire format, assignee embedded).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[schema(example = "Lead")]
    pub status: CustomerStatus,
    pub assigned_to_user_id: Option<Uuid>,
    pub assigned_to_user: Option<UserSummary>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerDetail> for CustomerResponse {
    fn from(detail: CustomerDetail) -> Self {
        let CustomerDetail {
            customer,
            assigned_to_user,
        } = detail;
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            company: customer.company,
            status: customer.status,
            assigned_to_user_id: customer.assigned_to_user_id,
            assigned_to_user,
            is_deleted: customer.is_deleted,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

/// Fields for creating a customer, already validated and typed.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: CustomerStatus,
    pub assigned_to_user_id: Option<Uuid>,
}

/// Partial update to a customer. `None` leaves a field unchanged; the
/// assignee is tri-state (`Some(None)` unassigns).
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<CustomerStatus>,
    pub assigned_to_user_id: Option<Option<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_exact_values() {
        assert_eq!(CustomerStatus::parse("Lead").unwrap(), CustomerStatus::Lead);
        assert_eq!(
            CustomerStatus::parse("Inactive").unwrap(),
            CustomerStatus::Inactive
        );
    }

    #[test]
    fn status_rejects_unknown_value_and_echoes_valid_set() {
        let err = CustomerStatus::parse("Closed").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid status. Must be one of: Lead, Prospect, Active, Inactive"
        );
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!(CustomerStatus::parse("lead").is_err());
    }

    #[test]
    fn default_status_is_lead() {
        assert_eq!(CustomerStatus::default(), CustomerStatus::Lead);
    }
}
