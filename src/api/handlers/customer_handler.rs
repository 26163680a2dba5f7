//! Customer CRUD, listing and assignment handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::rules::EMAIL_REGEX;
use crate::domain::{CustomerChanges, CustomerResponse, CustomerStatus, NewCustomer, Visibility};
use crate::errors::AppResult;
use crate::types::{Pagination, PaginationParams};

/// Distinguishes a field sent as `null` from one left out entirely.
/// Serde only calls this when the field is present, so `#[serde(default)]`
/// covers the absent case with the outer `None`.
fn tri_state<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Uuid>::deserialize(deserializer).map(Some)
}

/// Customer creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    /// Customer name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Acme Corp")]
    pub name: String,
    /// Customer email address (unique across live and deleted customers)
    #[validate(regex(path = *EMAIL_REGEX, message = "Invalid email format"))]
    #[schema(example = "contact@acme.example")]
    pub email: String,
    /// Phone number
    pub phone: Option<String>,
    /// Company name
    pub company: Option<String>,
    /// Pipeline status; defaults to Lead when omitted
    #[schema(example = "Lead")]
    pub status: Option<String>,
    /// User to assign the customer to
    pub assigned_to_user_id: Option<Uuid>,
}

/// Customer update request. Omitted fields are left untouched; sending
/// `assignedToUserId: null` clears the assignment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(regex(path = *EMAIL_REGEX, message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "tri_state")]
    #[schema(value_type = Option<Uuid>)]
    pub assigned_to_user_id: Option<Option<Uuid>>,
}

/// Customer assignment request. A missing or null `assignedToUserId`
/// clears the assignment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignCustomerRequest {
    pub assigned_to_user_id: Option<Uuid>,
}

/// Single-customer mutation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerMessageResponse {
    pub message: String,
    pub customer: CustomerResponse,
}

/// Single-customer fetch response
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerEnvelope {
    pub customer: CustomerResponse,
}

/// Paginated customer list response
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerResponse>,
    pub pagination: Pagination,
}

/// Soft-delete confirmation
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCustomerResponse {
    pub message: String,
    pub customer_id: Uuid,
}

/// Create customer routes
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/:id/assign", put(assign_customer))
}

/// Create a new customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerMessageResponse),
        (status = 400, description = "Validation error or unknown assignee"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(_caller): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<CustomerMessageResponse>)> {
    let status = match payload.status.as_deref() {
        Some(raw) => CustomerStatus::parse(raw)?,
        None => CustomerStatus::default(),
    };

    let detail = state
        .customer_service
        .create(NewCustomer {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            status,
            assigned_to_user_id: payload.assigned_to_user_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerMessageResponse {
            message: "Customer created successfully".to_string(),
            customer: CustomerResponse::from(detail),
        }),
    ))
}

/// List customers visible to the caller
#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Customer list", body = CustomerListResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CustomerListResponse>> {
    let visibility = Visibility::for_caller(caller.role, caller.id);
    let page = state
        .customer_service
        .list(visibility, params.page(), params.limit())
        .await?;

    Ok(Json(CustomerListResponse {
        pagination: Pagination::new(params.page(), params.limit(), page.total),
        customers: page
            .customers
            .into_iter()
            .map(CustomerResponse::from)
            .collect(),
    }))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = CustomerEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(_caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerEnvelope>> {
    let detail = state.customer_service.get(id).await?;
    Ok(Json(CustomerEnvelope {
        customer: CustomerResponse::from(detail),
    }))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerMessageResponse),
        (status = 400, description = "Validation error or unknown assignee"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(_caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> AppResult<Json<CustomerMessageResponse>> {
    let status = match payload.status.as_deref() {
        Some(raw) => Some(CustomerStatus::parse(raw)?),
        None => None,
    };

    let detail = state
        .customer_service
        .update(
            id,
            CustomerChanges {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                company: payload.company,
                status,
                assigned_to_user_id: payload.assigned_to_user_id,
            },
        )
        .await?;

    Ok(Json(CustomerMessageResponse {
        message: "Customer updated successfully".to_string(),
        customer: CustomerResponse::from(detail),
    }))
}

/// Soft-delete a customer
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = DeleteCustomerResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(_caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteCustomerResponse>> {
    state.customer_service.delete(id).await?;
    Ok(Json(DeleteCustomerResponse {
        message: "Customer deleted successfully".to_string(),
        customer_id: id,
    }))
}

/// Assign or unassign a customer (admin only)
#[utoipa::path(
    put,
    path = "/customers/{id}/assign",
    tag = "Customers",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Customer ID")),
    request_body = AssignCustomerRequest,
    responses(
        (status = 200, description = "Assignment updated", body = CustomerMessageResponse),
        (status = 400, description = "Unknown assignee"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn assign_customer(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignCustomerRequest>,
) -> AppResult<Json<CustomerMessageResponse>> {
    require_admin(&caller)?;

    let detail = state
        .customer_service
        .assign(id, payload.assigned_to_user_id)
        .await?;

    Ok(Json(CustomerMessageResponse {
        message: "Customer assigned successfully".to_string(),
        customer: CustomerResponse::from(detail),
    }))
}
