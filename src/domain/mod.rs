//! Domain layer - Core business entities and logic
//!
//! Entities, value objects, and the pure validation rules, independent of
//! HTTP and persistence concerns.

pub mod customer;
pub mod note;
pub mod password;
pub mod rules;
pub mod user;
pub mod visibility;

pub use customer::{
    Customer, CustomerChanges, CustomerDetail, CustomerResponse, CustomerStatus, CustomerSummary,
    NewCustomer,
};
pub use note::{Note, NoteDetail, NoteResponse};
pub use password::Password;
pub use user::{User, UserResponse, UserRole, UserSummary};
pub use visibility::Visibility;
