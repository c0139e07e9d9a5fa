use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::booking::{Booking, BookingStatus};
use crate::models::member::Member;

/// Envelope for every successful response: `success: true`, an optional
/// human-readable message, and the payload fields flattened alongside.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub result: T,
}

#[derive(Serialize, Debug, Default)]
pub struct Empty {}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            result,
        }
    }

    pub fn with_message(message: impl Into<String>, result: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            result,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_message(message, Empty {})
    }
}

// Request bodies. Every field is optional so that missing fields reach the
// handlers and are reported as validation errors instead of a 422.

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct EmailRequest {
    pub email: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PlanRequest {
    pub plan: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub plan: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AmountRequest {
    pub amount: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub email: Option<String>,
    pub ground_name: Option<String>,
    pub price: Option<Value>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PaymentVerificationRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

// Response payloads.

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

#[derive(Serialize, Debug)]
pub struct LoginResult {
    pub user: UserView,
    pub token: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub is_active_member: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_first_booking_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_bookings: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_savings: Option<f64>,
}

impl MembershipStatus {
    pub fn inactive() -> Self {
        MembershipStatus {
            is_active_member: false,
            plan: None,
            discount_percentage: None,
            has_first_booking_offer: None,
            total_bookings: None,
            total_savings: None,
        }
    }

    pub fn active(member: &Member) -> Self {
        MembershipStatus {
            is_active_member: true,
            plan: member.plan.map(|plan| plan.to_string()),
            discount_percentage: Some(member.discount_percentage),
            has_first_booking_offer: Some(member.has_first_booking_offer),
            total_bookings: Some(member.total_bookings),
            total_savings: Some(member.total_savings),
        }
    }
}

/// Returned to clients so they can open the gateway's checkout widget.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order_id: String,
    pub amount: i64,
    pub key_id: String,
}

#[derive(Serialize, Debug)]
pub struct CheckoutResult {
    pub email: String,
}

/// Member as exposed over HTTP; never carries the password hash.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MemberView {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub plan: Option<String>,
    pub status: String,
    pub purchase_date: Option<DateTime<Utc>>,
    pub renewal_date: Option<DateTime<Utc>>,
    pub discount_percentage: i32,
    pub has_first_booking_offer: bool,
    pub total_bookings: i64,
    pub total_savings: f64,
    pub created_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<&Member> for MemberView {
    fn from(member: &Member) -> Self {
        MemberView {
            id: member.id_hex(),
            full_name: member.full_name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            plan: member.plan.map(|plan| plan.to_string()),
            status: member.status.as_str().to_string(),
            purchase_date: member.purchase_date,
            renewal_date: member.renewal_date,
            discount_percentage: member.discount_percentage,
            has_first_booking_offer: member.has_first_booking_offer,
            total_bookings: member.total_bookings,
            total_savings: member.total_savings,
            created_at: member.created_at,
            cancelled_at: member.cancelled_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MemberDetails {
    pub member: MemberView,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    pub member_id: String,
    pub email: String,
    pub ground_name: String,
    pub original_price: f64,
    pub discount_percentage: i32,
    pub discount: f64,
    pub extra_offer: f64,
    pub final_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Booking> for BookingView {
    fn from(booking: &Booking) -> Self {
        BookingView {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            member_id: booking.member_id.clone(),
            email: booking.email.clone(),
            ground_name: booking.ground_name.clone(),
            original_price: booking.original_price,
            discount_percentage: booking.discount_percentage,
            discount: booking.discount,
            extra_offer: booking.extra_offer,
            final_price: booking.final_price,
            status: booking.status,
            created_at: booking.created_at,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct BookingCreated {
    pub booking: BookingView,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistory {
    pub bookings: Vec<BookingView>,
    pub total_bookings: usize,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MemberListing {
    pub total_members: usize,
    pub members: Vec<MemberView>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStats {
    pub total_members: usize,
    pub active_members: usize,
    pub monthly_members: usize,
    pub pro_plus_members: usize,
    pub yearly_members: usize,
    pub total_bookings: u64,
    pub total_savings: f64,
    pub average_bookings_per_member: u64,
}

#[derive(Serialize, Debug)]
pub struct StatsReport {
    pub stats: MembershipStats,
}
