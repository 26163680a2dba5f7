//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence. Services
//! depend on the traits; the SeaORM stores are the production
//! implementations.

mod customer_repository;
pub(crate) mod entities;
mod note_repository;
mod user_repository;

pub use customer_repository::{CustomerRepository, CustomerStore};
pub use note_repository::{NoteRepository, NoteStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use customer_repository::MockCustomerRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use note_repository::MockNoteRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
