mod common;

use ground_booking_api::services::payment_gateway::sign_payment;
use rocket::http::Status;
use serde_json::json;

#[rocket::async_test]
async fn checkout_activates_membership() {
    let app = common::spawn().await;

    let (status, body) = app.checkout("pro-plus", "Ravi@Example.com").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["email"], "ravi@example.com");

    let (status, body) = app
        .post("/api/membership/verify", json!({ "email": "ravi@example.com" }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["isActiveMember"], true);
    assert_eq!(body["plan"], "pro-plus");
    assert_eq!(body["discountPercentage"], 20);
    assert_eq!(body["hasFirstBookingOffer"], true);
    assert_eq!(body["totalBookings"], 0);
}

#[rocket::async_test]
async fn verify_unknown_email_is_inactive() {
    let app = common::spawn().await;
    let (status, body) = app
        .post("/api/membership/verify", json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({ "success": true, "isActiveMember": false }));

    let (status, body) = app.post("/api/membership/verify", json!({})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["message"], "Email required");
}

#[rocket::async_test]
async fn signed_up_user_becomes_member_on_checkout() {
    let app = common::spawn().await;
    app.signup("asha@example.com", "pw").await;

    let (_, before) = app
        .post("/api/membership/verify", json!({ "email": "asha@example.com" }))
        .await;
    assert_eq!(before["isActiveMember"], false);

    app.checkout("monthly", "asha@example.com").await;
    let (_, after) = app
        .post("/api/membership/verify", json!({ "email": "asha@example.com" }))
        .await;
    assert_eq!(after["isActiveMember"], true);
    assert_eq!(after["discountPercentage"], 10);
    assert_eq!(after["hasFirstBookingOffer"], false);

    // the password survives checkout
    app.login_token("asha@example.com", "pw").await;
}

#[rocket::async_test]
async fn unknown_plan_is_charged_and_activated_as_monthly() {
    let app = common::spawn().await;

    let (status, order) = app
        .post("/api/membership/create-order", json!({ "plan": "basic" }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(order["amount"], 49_900);

    let (status, body) = app.checkout("basic", "x@example.com").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["email"], "x@example.com");

    let (_, body) = app
        .post("/api/membership/verify", json!({ "email": "x@example.com" }))
        .await;
    assert_eq!(body["isActiveMember"], true);
    assert_eq!(body["plan"], "monthly");
    assert_eq!(body["discountPercentage"], 10);
    assert_eq!(body["hasFirstBookingOffer"], false);
}

#[rocket::async_test]
async fn checkout_validation() {
    let app = common::spawn().await;

    let (status, body) = app
        .post("/api/membership/checkout", json!({ "plan": "monthly", "email": "x@example.com" }))
        .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["message"], "Missing required fields");
}

#[rocket::async_test]
async fn membership_get_update_cancel() {
    let app = common::spawn().await;
    app.checkout("yearly", "ravi@example.com").await;

    let (status, body) = app.get("/api/membership/ravi@example.com").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["member"]["plan"], "yearly");
    assert_eq!(body["member"]["status"], "active");
    assert!(body["member"].get("passwordHash").is_none());

    let (status, _) = app
        .put("/api/membership/ravi@example.com", json!({ "phone": "9000000001" }))
        .await;
    assert_eq!(status, Status::Ok);
    let (_, body) = app.get("/api/membership/ravi@example.com").await;
    assert_eq!(body["member"]["phone"], "9000000001");
    assert_eq!(body["member"]["fullName"], "Ravi Kumar");

    let (status, body) = app.delete("/api/membership/ravi@example.com").await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["message"], "Membership cancelled successfully");

    let (_, body) = app
        .post("/api/membership/verify", json!({ "email": "ravi@example.com" }))
        .await;
    assert_eq!(body["isActiveMember"], false);
    let (_, body) = app.get("/api/membership/ravi@example.com").await;
    assert_eq!(body["member"]["status"], "cancelled");
}

#[rocket::async_test]
async fn renewing_a_cancelled_membership_clears_cancellation() {
    let app = common::spawn().await;
    app.checkout("monthly", "back@example.com").await;
    app.delete("/api/membership/back@example.com").await;
    let (_, body) = app.get("/api/membership/back@example.com").await;
    assert!(body["member"]["cancelledAt"].is_string());

    let (status, _) = app.checkout("pro-plus", "back@example.com").await;
    assert_eq!(status, Status::Ok);
    let (_, body) = app.get("/api/membership/back@example.com").await;
    assert_eq!(body["member"]["status"], "active");
    assert!(body["member"]["cancelledAt"].is_null());
}

#[rocket::async_test]
async fn unknown_member_is_not_found() {
    let app = common::spawn().await;

    let (status, body) = app.delete("/api/membership/ghost@example.com").await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["message"], "Member not found");

    let (status, _) = app.get("/api/membership/ghost@example.com").await;
    assert_eq!(status, Status::NotFound);
    let (status, _) = app
        .put("/api/membership/ghost@example.com", json!({ "phone": "1" }))
        .await;
    assert_eq!(status, Status::NotFound);
}

#[rocket::async_test]
async fn membership_order_uses_plan_price() {
    let app = common::spawn().await;

    let (status, body) = app
        .post("/api/membership/create-order", json!({ "plan": "yearly" }))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["amount"], 499_900);
    assert_eq!(body["key_id"], common::KEY_ID);
    assert!(body["order_id"].as_str().unwrap().starts_with("order_"));

    let (_, body) = app
        .post("/api/membership/create-order", json!({ "plan": "lifetime" }))
        .await;
    assert_eq!(body["amount"], 49_900);

    let orders = app.gateway.orders.lock().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.currency == "INR" && o.payment_capture == 1));
}

#[rocket::async_test]
async fn gateway_failure_is_server_error() {
    let app = common::spawn_with(common::StubGateway {
        reject: true,
        ..Default::default()
    })
    .await;
    let (status, body) = app
        .post("/api/membership/create-order", json!({ "plan": "monthly" }))
        .await;
    assert_eq!(status, Status::InternalServerError);
    assert_eq!(body["success"], false);
}

#[rocket::async_test]
async fn payment_signature_is_checked() {
    let app = common::spawn().await;
    let signature = sign_payment(common::KEY_SECRET, "order_1", "pay_1").unwrap();

    let (status, body) = app
        .post(
            "/api/membership/verify-payment",
            json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_1",
                "razorpay_signature": signature
            }),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], true);

    let (status, body) = app
        .post(
            "/api/membership/verify-payment",
            json!({
                "razorpay_order_id": "order_1",
                "razorpay_payment_id": "pay_2",
                "razorpay_signature": signature
            }),
        )
        .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["message"], "Payment verification failed");

    let (status, _) = app
        .post(
            "/api/membership/verify-payment",
            json!({ "razorpay_order_id": "order_1", "razorpay_payment_id": "pay_1" }),
        )
        .await;
    assert_eq!(status, Status::BadRequest);
}
