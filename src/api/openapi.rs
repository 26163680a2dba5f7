//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, customer_handler, dashboard_handler, note_handler};
use crate::domain::{
    CustomerResponse, CustomerStatus, CustomerSummary, NoteResponse, UserResponse, UserRole,
    UserSummary,
};
use crate::services::{DashboardSummary, StatusCounts};
use crate::types::Pagination;

/// OpenAPI documentation for the CRM backend
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CRM Backend",
        version = "0.1.0",
        description = "Customer relationship management API with JWT auth, role-based visibility and activity notes",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Customer endpoints
        customer_handler::create_customer,
        customer_handler::list_customers,
        customer_handler::get_customer,
        customer_handler::update_customer,
        customer_handler::delete_customer,
        customer_handler::assign_customer,
        // Note endpoints
        note_handler::create_note,
        note_handler::list_notes,
        note_handler::update_note,
        // Dashboard
        dashboard_handler::get_summary,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            UserSummary,
            CustomerStatus,
            CustomerSummary,
            CustomerResponse,
            NoteResponse,
            Pagination,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginResponse,
            // Customer handler types
            customer_handler::CreateCustomerRequest,
            customer_handler::UpdateCustomerRequest,
            customer_handler::AssignCustomerRequest,
            customer_handler::CustomerMessageResponse,
            customer_handler::CustomerEnvelope,
            customer_handler::CustomerListResponse,
            customer_handler::DeleteCustomerResponse,
            // Note handler types
            note_handler::NoteContentRequest,
            note_handler::NoteMessageResponse,
            note_handler::CustomerNotesResponse,
            // Dashboard types
            DashboardSummary,
            StatusCounts,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Customers", description = "Customer management and assignment"),
        (name = "Notes", description = "Customer activity notes"),
        (name = "Dashboard", description = "Aggregate pipeline metrics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
