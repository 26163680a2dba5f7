//! SeaORM entity definitions
//!
//! Database-specific entities, separate from the domain models they map to.

pub mod customer;
pub mod note;
pub mod user;
