use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, routes, Catcher, Request, Route};
use serde::Serialize;

use crate::error::ErrorBody;

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod membership;

pub fn routes() -> Vec<Route> {
    routes![health, all_options]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, unauthorized, not_found, unprocessable, internal_error]
}

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

#[get("/")]
fn health() -> Json<Health> {
    Json(Health {
        status: "success",
        message: "Sports Spots API is running",
    })
}

// Preflight for every path; the CORS fairing adds the headers.
#[options("/<_..>")]
fn all_options() -> Status {
    Status::Ok
}

#[catch(400)]
fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("Malformed request body"))
}

#[catch(401)]
fn unauthorized() -> Json<ErrorBody> {
    Json(ErrorBody::new("Admin authorization required"))
}

#[catch(404)]
fn not_found(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new(format!("404: '{}' route not found", req.uri())))
}

#[catch(422)]
fn unprocessable() -> Json<ErrorBody> {
    Json(ErrorBody::new("Request body has the wrong shape"))
}

#[catch(500)]
fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error"))
}
