use rocket::serde::json::Json;
use rocket::{get, post, routes, Route, State};

use crate::error::ApiError;
use crate::models::api::{
    AmountRequest, ApiResponse, BookingCreated, BookingHistory, BookingRequest, BookingView,
    Empty, OrderView, PaymentVerificationRequest,
};
use crate::services::booking_service::BookingService;
use crate::services::payment_service::PaymentService;

pub fn routes() -> Vec<Route> {
    routes![create_order, create_booking, booking_history, verify_payment]
}

#[post("/create-order", format = "json", data = "<request>")]
async fn create_order(
    payments: &State<PaymentService>,
    request: Json<AmountRequest>,
) -> Result<Json<ApiResponse<OrderView>>, ApiError> {
    let order = payments.create_booking_order(request.amount.as_ref()).await?;
    Ok(Json(ApiResponse::ok(order)))
}

#[post("/", format = "json", data = "<request>")]
async fn create_booking(
    bookings: &State<BookingService>,
    request: Json<BookingRequest>,
) -> Result<Json<ApiResponse<BookingCreated>>, ApiError> {
    let booking = bookings.create_booking(request.into_inner()).await?;
    Ok(Json(ApiResponse::with_message(
        "Booking confirmed!",
        BookingCreated {
            booking: BookingView::from(&booking),
        },
    )))
}

#[get("/<email>")]
async fn booking_history(
    bookings: &State<BookingService>,
    email: &str,
) -> Result<Json<ApiResponse<BookingHistory>>, ApiError> {
    let bookings = bookings.history(email).await?;
    Ok(Json(ApiResponse::ok(BookingHistory {
        total_bookings: bookings.len(),
        bookings,
    })))
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
