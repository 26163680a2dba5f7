//! Infrastructure layer - External systems integration
//!
//! Database connections, migrations, and the repository implementations.

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{
    CustomerRepository, CustomerStore, NoteRepository, NoteStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockCustomerRepository, MockNoteRepository, MockUserRepository};
