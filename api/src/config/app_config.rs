use std::collections::HashSet;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE: &str = "sports_spots";
const DEFAULT_RAZORPAY_API_BASE: &str = "https://api.razorpay.com";
const DEFAULT_CURRENCY: &str = "INR";
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 15;
const DEFAULT_JWT_TTL_SECS: u64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
    pub currency: String,
    pub timeout: Duration,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub database_name: String,
    pub razorpay: RazorpayConfig,
    /// Lowercased administrator emails (`ADMIN_EMAILS`, comma separated).
    pub admin_emails: HashSet<String>,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let seconds = |name: &'static str, default: u64| -> Result<Duration, ConfigError> {
            match get(name) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::Invalid { name, value: raw }),
                None => Ok(Duration::from_secs(default)),
            }
        };

        Ok(AppConfig {
            mongo_uri: get("MONGO_URI").unwrap_or_else(|| DEFAULT_MONGO_URI.to_string()),
            database_name: get("MONGO_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            razorpay: RazorpayConfig {
                key_id: require("RAZORPAY_KEY_ID")?,
                key_secret: require("RAZORPAY_KEY_SECRET")?,
                api_base: get("RAZORPAY_API_BASE")
                    .unwrap_or_else(|| DEFAULT_RAZORPAY_API_BASE.to_string()),
                currency: get("PAYMENT_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                timeout: seconds("GATEWAY_TIMEOUT_SECS", DEFAULT_GATEWAY_TIMEOUT_SECS)?,
            },
            admin_emails: parse_admin_emails(get("ADMIN_EMAILS").as_deref().unwrap_or_default()),
            jwt_secret: require("JWT_SECRET")?,
            jwt_ttl: seconds("JWT_TTL_SECS", DEFAULT_JWT_TTL_SECS)?,
        })
    }
}

pub fn parse_admin_emails(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}
