use rocket::serde::json::Json;
use rocket::{get, routes, Route, State};

use crate::error::ApiError;
use crate::jwt::admin_guard::AdminUser;
use crate::models::api::{ApiResponse, MemberListing, StatsReport};
use crate::services::membership_service::MembershipService;

pub fn routes() -> Vec<Route> {
    routes![list_members, stats]
}

#[get("/members")]
async fn list_members(
    admin: AdminUser,
    memberships: &State<MembershipService>,
) -> Result<Json<ApiResponse<MemberListing>>, ApiError> {
    let members = memberships.list().await?;
    tracing::info!(admin = %admin.email, count = members.len(), "members listed");
    Ok(Json(ApiResponse::ok(MemberListing {
        total_members: members.len(),
        members,
    })))
}

#[get("/stats")]
async fn stats(
    _admin: AdminUser,
    memberships: &State<MembershipService>,
) -> Result<Json<ApiResponse<StatsReport>>, ApiError> {
    let stats = memberships.stats().await?;
    Ok(Json(ApiResponse::ok(StatsReport { stats })))
}
