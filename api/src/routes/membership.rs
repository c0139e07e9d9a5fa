use rocket::serde::json::Json;
use rocket::{delete, get, post, put, routes, Route, State};

use crate::error::ApiError;
use crate::models::api::{
    ApiResponse, CheckoutRequest, CheckoutResult, EmailRequest, Empty, MemberDetails,
    MembershipStatus, OrderView, PaymentVerificationRequest, PlanRequest, ProfileUpdateRequest,
};
use crate::services::membership_service::MembershipService;
use crate::services::payment_service::PaymentService;

pub fn routes() -> Vec<Route> {
    routes![
        verify,
        create_order,
        verify_payment,
        checkout,
        get_membership,
        update_membership,
        cancel_membership
    ]
}

#[post("/verify", format = "json", data = "<request>")]
async fn verify(
    memberships: &State<MembershipService>,
    request: Json<EmailRequest>,
) -> Result<Json<ApiResponse<MembershipStatus>>, ApiError> {
    let status = memberships.verify(request.into_inner().email).await?;
    Ok(Json(ApiResponse::ok(status)))
}

#[post("/create-order", format = "json", data = "<request>")]
async fn create_order(
    payments: &State<PaymentService>,
    request: Json<PlanRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let order = payments.create_membership_order(request.plan.as_deref()).await?;
    Ok(Json(ApiResponse::ok(order)))
}

#[post("/verify-payment", format = "json", data = "<request>")]
fn verify_payment(
    payments: &State<PaymentService>,
    request: Json<PaymentVerificationRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    payments.verify_payment(
        request.razorpay_order_id.as_deref(),
        request.razorpay_payment_id.as_deref(),
        request.razorpay_signature.as_deref(),
    )?;
    Ok(Json(ApiResponse::message("Payment verified")))
}

#[post("/checkout", format = "json", data = "<request>")]
async fn checkout(
    memberships: &State<MembershipService>,
    request: Json<CheckoutRequest>,
) -> Result<Json<ApiResponse<CheckoutResult>>, ApiError> {
    let member = memberships.checkout(request.into_inner()).await?;
    Ok(Json(ApiResponse::with_message(
        "Membership activated successfully!",
        CheckoutResult {
            email: member.email,
        },
    )))
}

#[get("/<email>")]
async fn get_membership(
    memberships: &State<MembershipService>,
    email: &str,
) -> Result<Json<ApiResponse<MemberDetails>>, ApiError> {
    let member = memberships.get(email).await?;
    Ok(Json(ApiResponse::ok(MemberDetails { member })))
}

#[put("/<email>", format = "json", data = "<request>")]
async fn update_membership(
    memberships: &State<MembershipService>,
    email: &str,
    request: Json<ProfileUpdateRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    memberships.update_profile(email, request.into_inner()).await?;
    Ok(Json(ApiResponse::message("Membership updated successfully")))
}

#[delete("/<email>")]
async fn cancel_membership(
    memberships: &State<MembershipService>,
    email: &str,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    memberships.cancel(email).await?;
    Ok(Json(ApiResponse::message("Membership cancelled successfully")))
}
