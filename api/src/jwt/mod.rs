pub mod admin_guard;
pub mod claims;
pub mod jwt_helper;
