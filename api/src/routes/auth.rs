use rocket::serde::json::Json;
use rocket::{post, routes, Route, State};

use crate::error::ApiError;
use crate::models::api::{ApiResponse, Empty, LoginRequest, LoginResult, SignupRequest};
use crate::services::auth_service::AuthService;

pub fn routes() -> Vec<Route> {
    routes![signup, login]
}

#[post("/signup", format = "json", data = "<request>")]
async fn signup(
    auth: &State<AuthService>,
    request: Json<SignupRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    auth.signup(request.into_inner()).await?;
    Ok(Json(ApiResponse::message("Signup successful! Please login.")))
}

#[post("/login", format = "json", data = "<request>")]
async fn login(
    auth: &State<AuthService>,
    request: Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResult>>, ApiError> {
    let LoginRequest { email, password } = request.into_inner();
    let result = auth.login(email, password).await?;
    Ok(Json(ApiResponse::ok(result)))
}
