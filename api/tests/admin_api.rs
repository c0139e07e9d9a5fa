mod common;

use rocket::http::Status;

#[rocket::async_test]
async fn admin_routes_require_a_token() {
    let app = common::spawn().await;

    let (status, body) = app.get("/api/members").await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["success"], false);

    let (status, _) = app.get_as("/api/stats", "not-a-jwt").await;
    assert_eq!(status, Status::Unauthorized);
}

#[rocket::async_test]
async fn non_admin_token_is_refused() {
    let app = common::spawn().await;
    app.signup("asha@example.com", "pw").await;
    let token = app.login_token("asha@example.com", "pw").await;

    let (status, _) = app.get_as("/api/members", &token).await;
    assert_eq!(status, Status::Unauthorized);
}

#[rocket::async_test]
async fn admin_sees_members_and_stats() {
    let app = common::spawn().await;
    app.signup(common::ADMIN_EMAIL, "admin-pw").await;
    let token = app.login_token("Admin@GroundBooking.com", "admin-pw").await;

    app.checkout("yearly", "a@example.com").await;
    app.checkout("pro-plus", "b@example.com").await;
    app.post(
        "/api/bookings",
        serde_json::json!({ "email": "a@example.com", "groundName": "Turf", "price": 1000 }),
    )
    .await;

    let (status, body) = app.get_as("/api/members", &token).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["totalMembers"], 3);
    assert!(body["members"]
        .as_array()
        .unwrap()
        .iter()
        .all(|m| m.get("passwordHash").is_none()));

    let (status, body) = app.get_as("/api/stats", &token).await;
    assert_eq!(status, Status::Ok);
    let stats = &body["stats"];
    assert_eq!(stats["totalMembers"], 3);
    assert_eq!(stats["activeMembers"], 2);
    assert_eq!(stats["yearlyMembers"], 1);
    assert_eq!(stats["proPlusMembers"], 1);
    assert_eq!(stats["monthlyMembers"], 0);
    assert_eq!(stats["totalBookings"], 1);
    assert_eq!(stats["totalSavings"], 200.0);
    assert_eq!(stats["averageBookingsPerMember"], 0);
}
