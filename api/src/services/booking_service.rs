use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::api::{BookingRequest, BookingView};
use crate::models::booking::{Booking, BookingQuote};
use crate::models::member::normalize_email;
use crate::repository::{BookingSettlement, BookingStore, MemberStore};
use crate::services::{optional_field, require_field};

/// Conditional settlement attempts before giving up on a contended member.
const MAX_SETTLEMENT_ATTEMPTS: usize = 3;

const NOT_ACTIVE: &str = "Member not active or not found";

pub struct BookingService {
    members: Arc<dyn MemberStore>,
    bookings: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(members: Arc<dyn MemberStore>, bookings: Arc<dyn BookingStore>) -> Self {
        BookingService { members, bookings }
    }

    /// Prices a booking for an active member, settles the member's counters
    /// with a conditional update and stores the booking.
    ///
    /// The settlement only applies if `totalBookings` still holds the value
    /// the quote was computed from, so two concurrent bookings cannot both
    /// take the first-booking offer or lose an increment. The loser re-reads
    /// the member and is quoted again.
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, ApiError> {
        let email = optional_field(request.email)
            .map(|e| normalize_email(&e))
            .ok_or_else(|| ApiError::Auth(NOT_ACTIVE.to_string()))?;
        let ground_name = optional_field(request.ground_name);
        let price = parse_price(request.price.as_ref());

        for attempt in 1..=MAX_SETTLEMENT_ATTEMPTS {
            let member = self
                .members
                .find_by_email(&email)
                .await?
                .filter(|m| m.is_active())
                .ok_or_else(|| ApiError::Auth(NOT_ACTIVE.to_string()))?;
            // must fail before the counters are settled
            let ground_name = require_field(ground_name.clone())?;

            let quote = BookingQuote::for_member(price, &member);
            let settlement = BookingSettlement {
                expected_total_bookings: member.total_bookings,
                savings: quote.total_discount(),
                consume_offer: quote.consumes_offer(),
            };

            if !self.members.settle_booking(&email, &settlement).await? {
                tracing::warn!(%email, attempt, "member changed while booking, retrying");
                continue;
            }

            let booking = Booking::confirmed(&member, ground_name, &quote, Utc::now());
            return match self.bookings.insert(booking).await {
                Ok(booking) => {
                    tracing::info!(
                        %email,
                        ground = %booking.ground_name,
                        original_price = booking.original_price,
                        discount = booking.discount,
                        extra_offer = booking.extra_offer,
                        final_price = booking.final_price,
                        "booking confirmed"
                    );
                    Ok(booking)
                }
                Err(err) => {
                    tracing::error!(
                        %email,
                        error = %err,
                        "booking insert failed after settlement, reverting member counters"
                    );
                    if let Err(revert_err) =
                        self.members.revert_settlement(&email, &settlement).await
                    {
                        tracing::error!(
                            %email,
                            error = %revert_err,
                            savings = settlement.savings,
                            offer_consumed = settlement.consume_offer,
                            "member counters left inconsistent with bookings"
                        );
                    }
                    Err(err.into())
                }
            };
        }

        Err(ApiError::Conflict(
            "Booking could not be settled, please retry".to_string(),
        ))
    }

    pub async fn history(&self, email: &str) -> Result<Vec<BookingView>, ApiError> {
        let email = normalize_email(email);
        let bookings = self.bookings.find_by_email(&email).await?;
        Ok(bookings.iter().map(BookingView::from).collect())
    }

    pub async fn list(&self) -> Result<Vec<Booking>, ApiError> {
        Ok(self.bookings.list().await?)
    }
}

/// Prices arrive as JSON numbers or strings. Anything unparsable,
/// negative or non-finite counts as zero.
pub fn parse_price(price: Option<&Value>) -> f64 {
    let parsed = match price {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|p| p.is_finite() && *p >= 0.0).unwrap_or(0.0)
}
