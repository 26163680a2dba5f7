//! Integration tests for API endpoints.
//!
//! These tests use mock services behind the real router and middleware,
//! so status codes, auth gating and response shapes are exercised without
//! a database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use crm_backend::api::{create_router, AppState};
use crm_backend::domain::{
    Customer, CustomerChanges, CustomerDetail, CustomerStatus, CustomerSummary, NewCustomer, Note,
    NoteDetail, User, UserRole, UserSummary, Visibility,
};
use crm_backend::errors::{AppError, AppResult};
use crm_backend::infra::Database;
use crm_backend::services::{
    AuthService, Claims, CustomerNotes, CustomerPage, CustomerService, DashboardService,
    DashboardSummary, NoteService, Session, StatusCounts,
};

const USER_TOKEN: &str = "valid-user-token";
const ADMIN_TOKEN: &str = "valid-admin-token";

fn fixed_user_id() -> Uuid {
    Uuid::from_u128(1)
}

fn fixed_admin_id() -> Uuid {
    Uuid::from_u128(2)
}

fn known_customer_id() -> Uuid {
    Uuid::from_u128(10)
}

fn test_user() -> User {
    User {
        id: fixed_user_id(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        role: UserRole::User,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_customer() -> Customer {
    Customer {
        id: known_customer_id(),
        name: "Acme Corp".to_string(),
        email: "contact@acme.example".to_string(),
        phone: None,
        company: None,
        status: CustomerStatus::Lead,
        assigned_to_user_id: None,
        is_deleted: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_detail() -> CustomerDetail {
    CustomerDetail {
        customer: test_customer(),
        assigned_to_user: None,
    }
}

fn test_note_detail() -> NoteDetail {
    let customer = test_customer();
    NoteDetail {
        note: Note {
            id: Uuid::from_u128(20),
            customer_id: customer.id,
            created_by_user_id: fixed_user_id(),
            content: "Followed up".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
        created_by_user: UserSummary::from(test_user()),
        customer: CustomerSummary::from(&customer),
    }
}

// =============================================================================
// Mock Services
// =============================================================================

/// Auth mock that recognizes two fixed tokens, one per role
struct StubAuthService;

#[async_trait]
impl AuthService for StubAuthService {
    async fn register(&self, name: String, email: String, _password: String) -> AppResult<User> {
        Ok(User {
            name,
            email,
            ..test_user()
        })
    }

    async fn login(&self, _email: String, _password: String) -> AppResult<Session> {
        Ok(Session {
            token: USER_TOKEN.to_string(),
            user: test_user(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let (sub, role) = match token {
            USER_TOKEN => (fixed_user_id(), UserRole::User),
            ADMIN_TOKEN => (fixed_admin_id(), UserRole::Admin),
            _ => return Err(AppError::TokenInvalid),
        };
        Ok(Claims {
            sub,
            email: "test@example.com".to_string(),
            role,
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + 3600,
        })
    }
}

/// Customer mock that knows exactly one customer
struct StubCustomerService;

#[async_trait]
impl CustomerService for StubCustomerService {
    async fn create(&self, input: NewCustomer) -> AppResult<CustomerDetail> {
        Ok(CustomerDetail {
            customer: Customer {
                name: input.name,
                email: input.email,
                status: input.status,
                ..test_customer()
            },
            assigned_to_user: None,
        })
    }

    async fn list(
        &self,
        _visibility: Visibility,
        _page: u64,
        _limit: u64,
    ) -> AppResult<CustomerPage> {
        Ok(CustomerPage {
            customers: vec![test_detail()],
            total: 1,
        })
    }

    async fn get(&self, id: Uuid) -> AppResult<CustomerDetail> {
        if id == known_customer_id() {
            Ok(test_detail())
        } else {
            Err(AppError::not_found("Customer"))
        }
    }

    async fn update(&self, id: Uuid, _changes: CustomerChanges) -> AppResult<CustomerDetail> {
        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.get(id).await.map(|_| ())
    }

    async fn assign(&self, id: Uuid, assignee: Option<Uuid>) -> AppResult<CustomerDetail> {
        let mut detail = self.get(id).await?;
        detail.customer.assigned_to_user_id = assignee;
        Ok(detail)
    }
}

struct StubNoteService;

#[async_trait]
impl NoteService for StubNoteService {
    async fn create(
        &self,
        customer_id: Uuid,
        _author_id: Uuid,
        content: &str,
    ) -> AppResult<NoteDetail> {
        if content.trim().is_empty() {
            return Err(AppError::bad_request("Content is required"));
        }
        if customer_id != known_customer_id() {
            return Err(AppError::not_found("Customer"));
        }
        Ok(test_note_detail())
    }

    async fn list_for_customer(&self, customer_id: Uuid) -> AppResult<CustomerNotes> {
        if customer_id != known_customer_id() {
            return Err(AppError::not_found("Customer"));
        }
        let detail = test_note_detail();
        Ok(CustomerNotes {
            customer_id,
            customer_name: "Acme Corp".to_string(),
            notes: vec![(detail.note, Some(detail.created_by_user))],
        })
    }

    async fn update(&self, _note_id: Uuid, caller_id: Uuid, _content: &str) -> AppResult<NoteDetail> {
        if caller_id != fixed_user_id() {
            return Err(AppError::forbidden("You can only edit your own notes"));
        }
        Ok(test_note_detail())
    }
}

struct StubDashboardService;

#[async_trait]
impl DashboardService for StubDashboardService {
    async fn summary(&self, _visibility: Visibility) -> AppResult<DashboardSummary> {
        Ok(DashboardSummary {
            total_customers: 1,
            customers_by_status: StatusCounts::default(),
            activities_last7_days: 0,
        })
    }
}

fn test_app() -> Router {
    // one queued exec result is enough for the health check's SELECT 1
    let connection = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let state = AppState::new(
        Arc::new(StubAuthService),
        Arc::new(StubCustomerService),
        Arc::new(StubNoteService),
        Arc::new(StubDashboardService),
        Arc::new(Database::from_connection(connection)),
    );
    create_router(state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(method: &str, path: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// =============================================================================
// Auth gating
// =============================================================================

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let (status, body) = send(test_app(), get("/customers", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "No token provided");
}

#[tokio::test]
async fn protected_route_with_bad_token_is_unauthorized() {
    let (status, body) = send(test_app(), get("/customers", Some("garbage"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn missing_bearer_prefix_is_unauthorized() {
    let request = Request::builder()
        .uri("/customers")
        .header(header::AUTHORIZATION, USER_TOKEN)
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn assign_requires_admin_role() {
    let path = format!("/customers/{}/assign", known_customer_id());
    let request = json_request("PUT", &path, Some(USER_TOKEN), serde_json::json!({}));
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin access required");
}

#[tokio::test]
async fn admin_can_assign() {
    let assignee = Uuid::new_v4();
    let path = format!("/customers/{}/assign", known_customer_id());
    let request = json_request(
        "PUT",
        &path,
        Some(ADMIN_TOKEN),
        serde_json::json!({ "assignedToUserId": assignee }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer assigned successfully");
    assert_eq!(body["customer"]["assignedToUserId"], assignee.to_string());
}

#[tokio::test]
async fn assign_with_malformed_body_is_bad_request_json() {
    let path = format!("/customers/{}/assign", known_customer_id());
    let request = json_request(
        "PUT",
        &path,
        Some(ADMIN_TOKEN),
        serde_json::json!({ "assignedToUserId": "not-a-uuid" }),
    );
    let (status, body) = send(test_app(), request).await;

    // body errors keep the {"error": ...} contract, never a bare 422
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// =============================================================================
// Auth endpoints
// =============================================================================

#[tokio::test]
async fn register_returns_created_user_without_password() {
    let request = json_request(
        "POST",
        "/auth/register",
        None,
        serde_json::json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "password": "SecurePass123!"
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "jane@example.com");
    assert_eq!(body["user"]["role"], "USER");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let request = json_request(
        "POST",
        "/auth/register",
        None,
        serde_json::json!({
            "name": "Jane Doe",
            "email": "not-an-email",
            "password": "SecurePass123!"
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid email format"));
}

#[tokio::test]
async fn register_rejects_short_password() {
    let request = json_request(
        "POST",
        "/auth/register",
        None,
        serde_json::json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "password": "short"
        }),
    );
    let (status, _) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let request = json_request(
        "POST",
        "/auth/login",
        None,
        serde_json::json!({
            "email": "test@example.com",
            "password": "SecurePass123!"
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["token"], USER_TOKEN);
    assert_eq!(body["user"]["id"], fixed_user_id().to_string());
}

// =============================================================================
// Customer endpoints
// =============================================================================

#[tokio::test]
async fn list_customers_returns_pagination_envelope() {
    let (status, body) = send(test_app(), get("/customers?page=1&limit=10", Some(USER_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customers"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn get_unknown_customer_is_not_found() {
    let path = format!("/customers/{}", Uuid::new_v4());
    let (status, body) = send(test_app(), get(&path, Some(USER_TOKEN))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn create_customer_returns_created_envelope() {
    let request = json_request(
        "POST",
        "/customers",
        Some(USER_TOKEN),
        serde_json::json!({
            "name": "Acme Corp",
            "email": "contact@acme.example"
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Customer created successfully");
    // status defaults to Lead when omitted
    assert_eq!(body["customer"]["status"], "Lead");
}

#[tokio::test]
async fn create_customer_rejects_unknown_status() {
    let request = json_request(
        "POST",
        "/customers",
        Some(USER_TOKEN),
        serde_json::json!({
            "name": "Acme Corp",
            "email": "contact@acme.example",
            "status": "Churned"
        }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Invalid status. Must be one of: Lead, Prospect, Active, Inactive"
    );
}

#[tokio::test]
async fn delete_customer_echoes_its_id() {
    let path = format!("/customers/{}", known_customer_id());
    let request = Request::builder()
        .method("DELETE")
        .uri(&path)
        .header(header::AUTHORIZATION, format!("Bearer {}", USER_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer deleted successfully");
    assert_eq!(body["customerId"], known_customer_id().to_string());
}

// =============================================================================
// Note endpoints
// =============================================================================

#[tokio::test]
async fn create_note_under_customer() {
    let path = format!("/customers/{}/notes", known_customer_id());
    let request = json_request(
        "POST",
        &path,
        Some(USER_TOKEN),
        serde_json::json!({ "content": "Followed up" }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Note created successfully");
    assert_eq!(body["note"]["content"], "Followed up");
    assert_eq!(body["note"]["createdByUser"]["id"], fixed_user_id().to_string());
}

#[tokio::test]
async fn create_note_without_content_field_is_bad_request_json() {
    let path = format!("/customers/{}/notes", known_customer_id());
    let request = json_request("POST", &path, Some(USER_TOKEN), serde_json::json!({}));
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn create_note_with_empty_content_is_bad_request() {
    let path = format!("/customers/{}/notes", known_customer_id());
    let request = json_request(
        "POST",
        &path,
        Some(USER_TOKEN),
        serde_json::json!({ "content": "" }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Content is required");
}

#[tokio::test]
async fn list_notes_returns_customer_history() {
    let path = format!("/customers/{}/notes", known_customer_id());
    let (status, body) = send(test_app(), get(&path, Some(USER_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["customerId"], known_customer_id().to_string());
    assert_eq!(body["customerName"], "Acme Corp");
    assert_eq!(body["total"], 1);
    // per-customer listings omit the redundant customer object on each note
    assert!(body["notes"][0].get("customer").is_none());
}

#[tokio::test]
async fn update_note_by_stranger_is_forbidden() {
    let request = json_request(
        "PUT",
        &format!("/notes/{}", Uuid::from_u128(20)),
        Some(ADMIN_TOKEN),
        serde_json::json!({ "content": "Revised" }),
    );
    let (status, body) = send(test_app(), request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only edit your own notes");
}

// =============================================================================
// Dashboard and infrastructure
// =============================================================================

#[tokio::test]
async fn dashboard_summary_has_expected_shape() {
    let (status, body) = send(test_app(), get("/dashboard/summary", Some(USER_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCustomers"], 1);
    assert_eq!(body["customersByStatus"]["Lead"], 0);
    assert_eq!(body["activitiesLast7Days"], 0);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let (status, body) = send(test_app(), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, body) = send(test_app(), get("/nope", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}
