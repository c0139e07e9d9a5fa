//! Process-local stores with the same semantics as the Mongo repositories,
//! including the conditional booking settlement.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::error::StoreError;
use crate::models::booking::Booking;
use crate::models::member::{Member, MemberStatus, MembershipTerms, MEMBER_SCHEMA_VERSION};
use crate::repository::{BookingSettlement, BookingStore, MemberStore, ProfileUpdate, StoreResult};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct InMemoryMemberStore {
    members: Mutex<Vec<Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record as-is, bypassing the duplicate check.
    pub fn seed(&self, mut member: Member) -> Member {
        member.id.get_or_insert_with(ObjectId::new);
        lock(&self.members).push(member.clone());
        member
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Member>> {
        Ok(lock(&self.members).iter().find(|m| m.email == email).cloned())
    }

    async fn insert(&self, mut member: Member) -> StoreResult<Member> {
        let mut members = lock(&self.members);
        if members.iter().any(|m| m.email == member.email) {
            return Err(StoreError::Duplicate(member.email));
        }
        member.id = Some(ObjectId::new());
        members.push(member.clone());
        Ok(member)
    }

    async fn apply_checkout(
        &self,
        email: &str,
        full_name: &str,
        phone: &str,
        terms: &MembershipTerms,
    ) -> StoreResult<bool> {
        let mut members = lock(&self.members);
        let Some(member) = members.iter_mut().find(|m| m.email == email) else {
            return Ok(false);
        };
        member.full_name = full_name.to_string();
        member.phone = phone.to_string();
        member.apply_terms(terms);
        member.cancelled_at = None;
        Ok(true)
    }

    async fn settle_booking(
        &self,
        email: &str,
        settlement: &BookingSettlement,
    ) -> StoreResult<bool> {
        let mut members = lock(&self.members);
        let Some(member) = members.iter_mut().find(|m| {
            m.email == email
                && m.status == MemberStatus::Active
                && m.total_bookings == settlement.expected_total_bookings
        }) else {
            return Ok(false);
        };
        member.total_bookings += 1;
        member.total_savings += settlement.savings;
        if settlement.consume_offer {
            member.has_first_booking_offer = false;
        }
        Ok(true)
    }

    async fn revert_settlement(
        &self,
        email: &str,
        settlement: &BookingSettlement,
    ) -> StoreResult<()> {
        let mut members = lock(&self.members);
        if let Some(member) = members.iter_mut().find(|m| m.email == email) {
            member.total_bookings -= 1;
            member.total_savings -= settlement.savings;
            if settlement.consume_offer {
                member.has_first_booking_offer = true;
            }
        }
        Ok(())
    }

    async fn cancel(&self, email: &str, at: DateTime<Utc>) -> StoreResult<bool> {
        let mut members = lock(&self.members);
        let Some(member) = members.iter_mut().find(|m| m.email == email) else {
            return Ok(false);
        };
        member.status = MemberStatus::Cancelled;
        member.cancelled_at = Some(at);
        Ok(true)
    }

    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate<'_>,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut members = lock(&self.members);
        let Some(member) = members.iter_mut().find(|m| m.email == email) else {
            return Ok(false);
        };
        if let Some(full_name) = update.full_name {
            member.full_name = full_name.to_string();
        }
        if let Some(phone) = update.phone {
            member.phone = phone.to_string();
        }
        member.updated_at = Some(at);
        Ok(true)
    }

    async fn list(&self) -> StoreResult<Vec<Member>> {
        Ok(lock(&self.members).clone())
    }

    async fn backfill_schema(&self) -> StoreResult<u64> {
        let mut touched = 0;
        for member in lock(&self.members).iter_mut() {
            if member.schema_version < MEMBER_SCHEMA_VERSION {
                member.schema_version = MEMBER_SCHEMA_VERSION;
                touched += 1;
            }
        }
        Ok(touched)
    }
}

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn insert(&self, mut booking: Booking) -> StoreResult<Booking> {
        booking.id = Some(ObjectId::new());
        lock(&self.bookings).push(booking.clone());
        Ok(booking)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Vec<Booking>> {
        Ok(lock(&self.bookings)
            .iter()
            .rev()
            .filter(|b| b.email == email)
            .cloned()
            .collect())
    }

    async fn list(&self) -> StoreResult<Vec<Booking>> {
        Ok(lock(&self.bookings).iter().rev().cloned().collect())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(lock(&self.bookings).len() as u64)
    }
}
