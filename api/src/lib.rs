use std::collections::HashSet;
use std::sync::Arc;

use rocket::{Build, Rocket};

pub mod config;
pub mod error;
pub mod jwt;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

use crate::jwt::jwt_helper::JwtKeys;
use crate::repository::{BookingStore, MemberStore};
use crate::services::auth_service::AuthService;
use crate::services::booking_service::BookingService;
use crate::services::cors_fairing::Cors;
use crate::services::membership_service::MembershipService;
use crate::services::payment_gateway::PaymentGateway;
use crate::services::payment_service::PaymentService;

/// Everything the HTTP layer needs, wired over shared stores.
pub struct AppServices {
    pub auth: AuthService,
    pub membership: MembershipService,
    pub booking: BookingService,
    pub payment: PaymentService,
}

impl AppServices {
    pub fn new(
        members: Arc<dyn MemberStore>,
        bookings: Arc<dyn BookingStore>,
        gateway: Arc<dyn PaymentGateway>,
        admin_emails: HashSet<String>,
        keys: JwtKeys,
    ) -> Self {
        AppServices {
            auth: AuthService::new(members.clone(), admin_emails, keys),
            membership: MembershipService::new(members.clone(), bookings.clone()),
            booking: BookingService::new(members, bookings),
            payment: PaymentService::new(gateway),
        }
    }
}

pub fn build_rocket(services: AppServices) -> Rocket<Build> {
    rocket::build()
        .manage(services.auth)
        .manage(services.membership)
        .manage(services.booking)
        .manage(services.payment)
        .attach(Cors::any_origin())
        .mount("/", routes::routes())
        .mount("/api/auth", routes::auth::routes())
        .mount("/api/membership", routes::membership::routes())
        .mount("/api/bookings", routes::bookings::routes())
        .mount("/api", routes::admin::routes())
        .register("/", routes::catchers())
}
