//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and repository access to fulfill the
//! API's operations. They depend on the repository traits, never on SeaORM
//! directly, which keeps them mockable.

mod auth_service;
mod customer_service;
mod dashboard_service;
mod note_service;

pub use auth_service::{AuthService, Authenticator, Claims, Session};
pub use customer_service::{CustomerManager, CustomerPage, CustomerService};
pub use dashboard_service::{DashboardReporter, DashboardService, DashboardSummary, StatusCounts};
pub use note_service::{CustomerNotes, NoteManager, NoteService};
