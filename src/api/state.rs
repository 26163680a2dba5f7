//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{CustomerStore, Database, NoteStore, UserStore};
use crate::services::{
    AuthService, Authenticator, CustomerManager, CustomerService, DashboardReporter,
    DashboardService, NoteManager, NoteService,
};

/// Application state containing all services.
///
/// One long-lived database handle is shared by reference into every
/// repository; there is no other cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub customer_service: Arc<dyn CustomerService>,
    pub note_service: Arc<dyn NoteService>,
    pub dashboard_service: Arc<dyn DashboardService>,
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production services over the SeaORM stores.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let connection = database.get_connection();
        let users = Arc::new(UserStore::new(connection.clone()));
        let customers = Arc::new(CustomerStore::new(connection.clone()));
        let notes = Arc::new(NoteStore::new(connection));

        Self {
            auth_service: Arc::new(Authenticator::new(users.clone(), config)),
            customer_service: Arc::new(CustomerManager::new(customers.clone(), users.clone())),
            note_service: Arc::new(NoteManager::new(notes.clone(), customers.clone(), users)),
            dashboard_service: Arc::new(DashboardReporter::new(customers, notes)),
            database,
        }
    }

    /// Create state with manually injected services (used by tests).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        customer_service: Arc<dyn CustomerService>,
        note_service: Arc<dyn NoteService>,
        dashboard_service: Arc<dyn DashboardService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            auth_service,
            customer_service,
            note_service,
            dashboard_service,
            database,
        }
    }
}
