//! Dashboard service - read-only summary aggregation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::ACTIVITY_WINDOW_DAYS;
use crate::domain::{CustomerStatus, Visibility};
use crate::errors::AppResult;
use crate::infra::{CustomerRepository, NoteRepository};

/// Customer counts per status. All four keys are always present, zero when
/// no customer holds that status.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StatusCounts {
    pub lead: u64,
    pub prospect: u64,
    pub active: u64,
    pub inactive: u64,
}

impl StatusCounts {
    fn record(&mut self, status: CustomerStatus, count: u64) {
        match status {
            CustomerStatus::Lead => self.lead = count,
            CustomerStatus::Prospect => self.prospect = count,
            CustomerStatus::Active => self.active = count,
            CustomerStatus::Inactive => self.inactive = count,
        }
    }

    pub fn total(&self) -> u64 {
        self.lead + self.prospect + self.active + self.inactive
    }
}

/// Dashboard summary scoped to the caller's visibility.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_customers: u64,
    pub customers_by_status: StatusCounts,
    pub activities_last7_days: u64,
}

/// Dashboard service trait for dependency injection.
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Compute the summary under the caller's visibility. Read-only.
    async fn summary(&self, visibility: Visibility) -> AppResult<DashboardSummary>;
}

/// Concrete implementation of [`DashboardService`].
pub struct DashboardReporter {
    customers: Arc<dyn CustomerRepository>,
    notes: Arc<dyn NoteRepository>,
}

impl DashboardReporter {
    pub fn new(customers: Arc<dyn CustomerRepository>, notes: Arc<dyn NoteRepository>) -> Self {
        Self { customers, notes }
    }
}

#[async_trait]
impl DashboardService for DashboardReporter {
    async fn summary(&self, visibility: Visibility) -> AppResult<DashboardSummary> {
        let total_customers = self.customers.count(visibility).await?;

        let mut customers_by_status = StatusCounts::default();
        for (status, count) in self.customers.count_by_status(visibility).await? {
            // Unknown status strings cannot appear: the column only holds
            // values written through CustomerStatus
            if let Ok(status) = CustomerStatus::parse(&status) {
                customers_by_status.record(status, count.max(0) as u64);
            }
        }

        let cutoff = Utc::now() - Duration::days(ACTIVITY_WINDOW_DAYS);
        let activities_last7_days = self.notes.count_created_since(cutoff, visibility).await?;

        Ok(DashboardSummary {
            total_customers,
            customers_by_status,
            activities_last7_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_counts_serialize_with_all_four_keys() {
        let counts = StatusCounts {
            lead: 2,
            ..Default::default()
        };
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Lead": 2, "Prospect": 0, "Active": 0, "Inactive": 0})
        );
    }

    #[test]
    fn summary_field_names_are_camel_case() {
        let summary = DashboardSummary {
            total_customers: 1,
            customers_by_status: StatusCounts::default(),
            activities_last7_days: 0,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("totalCustomers").is_some());
        assert!(json.get("customersByStatus").is_some());
        assert!(json.get("activitiesLast7Days").is_some());
    }
}
