use std::collections::HashSet;
use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;

use crate::error::{ApiError, StoreError};
use crate::jwt::claims::Claims;
use crate::jwt::jwt_helper::JwtKeys;
use crate::models::api::{LoginResult, SignupRequest, UserView};
use crate::models::member::{normalize_email, Member};
use crate::repository::MemberStore;
use crate::services::require_field;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService {
    members: Arc<dyn MemberStore>,
    admin_emails: HashSet<String>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(members: Arc<dyn MemberStore>, admin_emails: HashSet<String>, keys: JwtKeys) -> Self {
        AuthService {
            members,
            admin_emails,
            keys,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<Member, ApiError> {
        let full_name = require_field(request.full_name)?;
        let email = normalize_email(&require_field(request.email)?);
        let phone = require_field(request.phone)?;
        let password = require_field(request.password)?;

        if self.members.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Duplicate("User already exists".to_string()));
        }

        let mut member = Member::new(email, full_name, phone, Utc::now());
        member.password_hash = Some(hash_password(&password)?);

        let member = self.members.insert(member).await.map_err(|err| match err {
            StoreError::Duplicate(_) => ApiError::Duplicate("User already exists".to_string()),
            other => other.into(),
        })?;
        tracing::info!(email = %member.email, "member signed up");
        Ok(member)
    }

    pub async fn login(
        &self,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<LoginResult, ApiError> {
        let email = email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty());
        let password = password.filter(|p| !p.is_empty());
        let (Some(email), Some(password)) = (email, password) else {
            return Err(ApiError::Validation("Email and password required".to_string()));
        };

        let member = self.members.find_by_email(&email).await?;
        let authenticated = member.filter(|m| {
            m.password_hash
                .as_deref()
                .is_some_and(|hash| verify_password(&password, hash))
        });
        let Some(member) = authenticated else {
            tracing::warn!(%email, "login rejected");
            return Err(ApiError::Auth(INVALID_CREDENTIALS.to_string()));
        };

        let is_admin = self.is_admin(&member.email);
        let token = self
            .keys
            .create_token(&member.email, is_admin)
            .map_err(|err| ApiError::Upstream(format!("token signing failed: {}", err)))?;

        Ok(LoginResult {
            user: UserView {
                id: member.id_hex(),
                email: member.email.clone(),
                full_name: member.full_name.clone(),
                is_admin,
            },
            token,
        })
    }

    pub fn is_admin(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.to_lowercase())
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        self.keys.verify_token(token)
    }
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Upstream(format!("password hashing failed: {}", err)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::app_config::parse_admin_emails;
    use crate::repository::memory::InMemoryMemberStore;
    use std::time::Duration;

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryMemberStore::new()),
            parse_admin_emails("admin@groundbooking.com"),
            JwtKeys::new("test-secret", Duration::from_secs(60)),
        )
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            full_name: Some("Asha Rao".into()),
            email: Some(email.into()),
            phone: Some("9999999999".into()),
            password: Some("hunter22".into()),
        }
    }

    #[test]
    fn password_hash_is_salted_and_verifiable() {
        let first = hash_password("pw").unwrap();
        let second = hash_password("pw").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("pw", &first));
        assert!(!verify_password("other", &first));
        assert!(!verify_password("pw", "plaintext"));
    }

    #[rocket::async_test]
    async fn signup_stores_inactive_member_with_hash() {
        let auth = service();
        let member = auth.signup(signup("  Asha@X.com ")).await.unwrap();
        assert_eq!(member.email, "asha@x.com");
        assert_eq!(member.total_bookings, 0);
        assert!(!member.is_active());
        assert_ne!(member.password_hash.as_deref(), Some("hunter22"));
    }

    #[rocket::async_test]
    async fn second_signup_with_same_email_is_duplicate() {
        let auth = service();
        auth.signup(signup("asha@x.com")).await.unwrap();
        let err = auth.signup(signup("ASHA@x.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Duplicate(_)));
    }

    #[rocket::async_test]
    async fn signup_requires_every_field() {
        let auth = service();
        let mut request = signup("a@x.com");
        request.phone = None;
        assert!(matches!(auth.signup(request).await, Err(ApiError::Validation(_))));
    }

    #[rocket::async_test]
    async fn login_is_case_insensitive_and_flags_admins() {
        let auth = service();
        auth.signup(signup("admin@groundbooking.com")).await.unwrap();

        let result = auth
            .login(Some("Admin@GroundBooking.com".into()), Some("hunter22".into()))
            .await
            .unwrap();
        assert!(result.user.is_admin);
        assert!(auth.verify_token(&result.token).unwrap().admin);
    }

    #[rocket::async_test]
    async fn wrong_password_is_auth_error() {
        let auth = service();
        auth.signup(signup("asha@x.com")).await.unwrap();
        let err = auth
            .login(Some("asha@x.com".into()), Some("wrong".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));

        let missing = auth.login(Some("asha@x.com".into()), None).await.unwrap_err();
        assert!(matches!(missing, ApiError::Validation(_)));
    }
}
