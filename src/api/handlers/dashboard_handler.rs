//! Dashboard summary handler.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Visibility;
use crate::errors::AppResult;
use crate::services::DashboardSummary;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

/// Dashboard summary scoped to the caller's visibility
#[utoipa::path(
    get,
    path = "/dashboard/summary",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Extension(caller): Extension<CurrentUser>,
) -> AppResult<Json<DashboardSummary>> {
    let visibility = Visibility::for_caller(caller.role, caller.id);
    let summary = state.dashboard_service.summary(visibility).await?;
    Ok(Json(summary))
}
