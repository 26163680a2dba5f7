//! Shared request/response types.

mod pagination;

pub use pagination::{Pagination, PaginationParams};
