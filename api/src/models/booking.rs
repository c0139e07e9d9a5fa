use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::models::member::Member;

/// Flat bonus for the first booking of a member holding the one-shot offer.
pub const FIRST_BOOKING_OFFER: f64 = 100.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Confirmed,
}

/// Pricing of one booking for a given member state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingQuote {
    pub original_price: f64,
    pub discount_percentage: i32,
    pub percentage_discount: f64,
    pub extra_offer: f64,
    pub final_price: f64,
}

impl BookingQuote {
    pub fn compute(
        price: f64,
        discount_percentage: i32,
        has_first_booking_offer: bool,
        total_bookings: i64,
    ) -> Self {
        let percentage_discount = price * f64::from(discount_percentage) / 100.0;
        let extra_offer = if has_first_booking_offer && total_bookings == 0 {
            FIRST_BOOKING_OFFER
        } else {
            0.0
        };
        let final_price = (price - percentage_discount - extra_offer).max(0.0);

        BookingQuote {
            original_price: price,
            discount_percentage,
            percentage_discount,
            extra_offer,
            final_price,
        }
    }

    pub fn for_member(price: f64, member: &Member) -> Self {
        Self::compute(
            price,
            member.discount_percentage,
            member.has_first_booking_offer,
            member.total_bookings,
        )
    }

    /// Percentage discount plus the flat offer; what the member saved.
    pub fn total_discount(&self) -> f64 {
        self.percentage_discount + self.extra_offer
    }

    pub fn consumes_offer(&self) -> bool {
        self.extra_offer > 0.0
    }
}

/// Stored in the `bookings` collection.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub member_id: String,
    pub email: String,
    pub ground_name: String,
    pub original_price: f64,
    #[serde(default)]
    pub discount_percentage: i32,
    pub discount: f64,
    #[serde(default)]
    pub extra_offer: f64,
    pub final_price: f64,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn confirmed(
        member: &Member,
        ground_name: String,
        quote: &BookingQuote,
        now: DateTime<Utc>,
    ) -> Self {
        Booking {
            id: None,
            member_id: member.id_hex(),
            email: member.email.clone(),
            ground_name,
            original_price: quote.original_price,
            discount_percentage: quote.discount_percentage,
            discount: quote.total_discount(),
            extra_offer: quote.extra_offer,
            final_price: quote.final_price,
            status: BookingStatus::Confirmed,
            created_at: now,
        }
    }
}
