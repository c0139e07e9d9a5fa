//! Record-store seams. The services only see these traits; `member_repository`
//! and `booking_repository` back them with MongoDB, `memory` with process
//! memory for tests and local runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::booking::Booking;
use crate::models::member::{Member, MembershipTerms};

pub mod booking_repository;
pub mod member_repository;
pub mod memory;

pub type StoreResult<T> = Result<T, StoreError>;

/// Counter changes applied to a member once a booking is priced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingSettlement {
    /// `totalBookings` the quote was computed against; the update only
    /// applies while the stored value still equals it.
    pub expected_total_bookings: i64,
    pub savings: f64,
    pub consume_offer: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileUpdate<'a> {
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
}

impl ProfileUpdate<'_> {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.phone.is_none()
    }
}

#[async_trait]
pub trait MemberStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Member>>;

    /// Inserts a new member. Fails with [`StoreError::Duplicate`] when the
    /// email is already taken.
    async fn insert(&self, member: Member) -> StoreResult<Member>;

    /// Activates the member with fresh terms. Returns `false` if no member
    /// has this email.
    async fn apply_checkout(
        &self,
        email: &str,
        full_name: &str,
        phone: &str,
        terms: &MembershipTerms,
    ) -> StoreResult<bool>;

    /// Conditional update: increments the booking counter, adds savings and
    /// optionally consumes the first-booking offer, but only if the member is
    /// still active with `expected_total_bookings` bookings. Returns whether
    /// the update applied.
    async fn settle_booking(&self, email: &str, settlement: &BookingSettlement)
        -> StoreResult<bool>;

    /// Undoes a settlement whose booking could not be stored.
    async fn revert_settlement(&self, email: &str, settlement: &BookingSettlement)
        -> StoreResult<()>;

    async fn cancel(&self, email: &str, at: DateTime<Utc>) -> StoreResult<bool>;

    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate<'_>,
        at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    async fn list(&self) -> StoreResult<Vec<Member>>;

    /// Writes defaults into records persisted by older schema versions.
    /// Returns the number of records touched.
    async fn backfill_schema(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn insert(&self, booking: Booking) -> StoreResult<Booking>;

    /// Bookings for one email, newest first.
    async fn find_by_email(&self, email: &str) -> StoreResult<Vec<Booking>>;

    async fn list(&self) -> StoreResult<Vec<Booking>>;

    async fn count(&self) -> StoreResult<u64>;
}
