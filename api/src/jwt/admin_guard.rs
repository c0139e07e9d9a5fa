use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

use crate::services::auth_service::AuthService;

/// Request guard for admin-only routes: requires `Authorization: Bearer`
/// with a valid token whose claims carry the admin flag.
#[derive(Debug)]
pub struct AdminUser {
    pub email: String,
}

#[derive(Debug, PartialEq)]
pub enum AdminAuthError {
    Missing,
    Invalid,
    NotAdmin,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AdminAuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(auth) = request.rocket().state::<AuthService>() else {
            return Outcome::Error((Status::InternalServerError, AdminAuthError::Invalid));
        };

        let Some(token) = request
            .headers()
            .get_one("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
        else {
            return Outcome::Error((Status::Unauthorized, AdminAuthError::Missing));
        };

        match auth.verify_token(token.trim()) {
            Ok(claims) if claims.admin => Outcome::Success(AdminUser { email: claims.sub }),
            Ok(claims) => {
                tracing::warn!(email = %claims.sub, "non-admin token used on admin route");
                Outcome::Error((Status::Unauthorized, AdminAuthError::NotAdmin))
            }
            Err(_) => Outcome::Error((Status::Unauthorized, AdminAuthError::Invalid)),
        }
    }
}
