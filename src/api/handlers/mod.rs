pub mod auth_handler;
pub mod customer_handler;
pub mod dashboard_handler;
pub mod note_handler;

pub use auth_handler::auth_routes;
pub use customer_handler::customer_routes;
pub use dashboard_handler::dashboard_routes;
pub use note_handler::{customer_note_routes, note_routes};
