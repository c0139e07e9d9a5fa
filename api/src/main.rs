use std::sync::Arc;

use ground_booking_api::config::app_config::AppConfig;
use ground_booking_api::config::mongo_config::setup_mongo;
use ground_booking_api::jwt::jwt_helper::JwtKeys;
use ground_booking_api::repository::booking_repository::BookingRepository;
use ground_booking_api::repository::member_repository::MemberRepository;
use ground_booking_api::services::payment_gateway::RazorpayGateway;
use ground_booking_api::{build_rocket, AppServices};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[rocket::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ground_booking_api=info,rocket=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    let client = setup_mongo(&config, "ground-booking-api").await?;
    let db = client.database(&config.database_name);
    tracing::info!(database = %config.database_name, "connected to mongo");

    let members = MemberRepository::new(&db);
    members.ensure_indexes().await?;
    let bookings = BookingRepository::new(&db);
    bookings.ensure_indexes().await?;

    let gateway = RazorpayGateway::new(config.razorpay.clone())?;
    let keys = JwtKeys::new(&config.jwt_secret, config.jwt_ttl);
    if config.admin_emails.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty, admin endpoints are unreachable");
    }

    let services = AppServices::new(
        Arc::new(members),
        Arc::new(bookings),
        Arc::new(gateway),
        config.admin_emails.clone(),
        keys,
    );

    if let Err(err) = build_rocket(services).launch().await {
        tracing::error!(error = %err, "server stopped with an error");
        return Err(err.to_string().into());
    }
    Ok(())
}
