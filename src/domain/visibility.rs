//! Role-derived customer visibility.
//!
//! The same predicate scopes the customer list, the dashboard counts, and
//! the recent-activity count: USER callers only see customers assigned to
//! them, ADMIN callers see everything.

use uuid::Uuid;

use super::UserRole;

/// Which customer records a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// No assignee filter (ADMIN callers).
    All,
    /// Only customers assigned to this user (USER callers).
    Assigned(Uuid),
}

impl Visibility {
    /// Derive the visibility filter from the caller's role and id.
    pub fn for_caller(role: UserRole, caller_id: Uuid) -> Self {
        match role {
            UserRole::Admin => Visibility::All,
            UserRole::User => Visibility::Assigned(caller_id),
        }
    }
}
