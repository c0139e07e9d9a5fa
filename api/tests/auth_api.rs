mod common;

use rocket::http::Status;
use serde_json::json;

#[rocket::async_test]
async fn health_reports_running() {
    let app = common::spawn().await;
    let (status, body) = app.get("/").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Sports Spots API is running");
}

#[rocket::async_test]
async fn signup_then_login() {
    let app = common::spawn().await;

    let (status, body) = app.signup("Asha@Example.com", "s3cret!").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Signup successful! Please login.");

    let (status, body) = app
        .post("/api/auth/login", json!({ "email": "asha@example.com", "password": "s3cret!" }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert_eq!(body["user"]["fullName"], "Asha Rao");
    assert_eq!(body["user"]["isAdmin"], false);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[rocket::async_test]
async fn duplicate_signup_is_rejected() {
    let app = common::spawn().await;
    app.signup("asha@example.com", "pw").await;

    let (status, body) = app.signup("ASHA@example.com", "other").await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists");
}

#[rocket::async_test]
async fn signup_with_missing_fields_is_rejected() {
    let app = common::spawn().await;
    let (status, body) = app
        .post("/api/auth/signup", json!({ "email": "x@example.com", "password": "pw" }))
        .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["message"], "Missing required fields");
}

#[rocket::async_test]
async fn login_failures() {
    let app = common::spawn().await;
    app.signup("asha@example.com", "right").await;

    let (status, body) = app
        .post("/api/auth/login", json!({ "email": "asha@example.com", "password": "wrong" }))
        .await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, _) = app
        .post("/api/auth/login", json!({ "email": "ghost@example.com", "password": "right" }))
        .await;
    assert_eq!(status, Status::Unauthorized);

    let (status, body) = app.post("/api/auth/login", json!({ "email": "asha@example.com" })).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["message"], "Email and password required");
}

#[rocket::async_test]
async fn stored_password_is_not_plaintext() {
    use ground_booking_api::repository::MemberStore;

    let app = common::spawn().await;
    app.signup("asha@example.com", "plain-pw").await;
    let member = app.members.find_by_email("asha@example.com").await.unwrap().unwrap();
    let hash = member.password_hash.unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(!hash.contains("plain-pw"));
}

#[rocket::async_test]
async fn responses_carry_cors_headers() {
    let app = common::spawn().await;
    let response = app.client.get("/").dispatch().await;
    assert_eq!(response.headers().get_one("Access-Control-Allow-Origin"), Some("*"));
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Headers"),
        Some("Content-Type, Authorization")
    );

    let preflight = app.client.options("/api/bookings").dispatch().await;
    assert_eq!(preflight.status(), Status::Ok);
    assert!(preflight
        .headers()
        .get_one("Access-Control-Allow-Methods")
        .is_some_and(|m| m.contains("DELETE")));
}

#[rocket::async_test]
async fn catchers_answer_in_json() {
    let app = common::spawn().await;

    let (status, body) = app.get("/api/nowhere").await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("/api/nowhere"));

    let response = app
        .client
        .post("/api/auth/login")
        .header(rocket::http::ContentType::JSON)
        .body("{")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = response.into_json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["success"], false);

    let (status, body) = app.post("/api/auth/login", json!({ "email": 42 })).await;
    assert_eq!(status, Status::UnprocessableEntity);
    assert_eq!(body["success"], false);
}
