use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};

use crate::error::StoreError;
use crate::models::member::{Member, MemberStatus, MembershipTerms, MEMBER_SCHEMA_VERSION};
use crate::repository::{BookingSettlement, MemberStore, ProfileUpdate, StoreResult};

pub const MEMBERS_COLLECTION: &str = "members";

pub struct MemberRepository {
    collection: Collection<Member>,
}

impl MemberRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Member>(MEMBERS_COLLECTION);
        MemberRepository { collection }
    }

    /// Unique index on `email`; the insert path relies on it to reject
    /// concurrent signups for the same address.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }
}

fn time(at: &DateTime<Utc>) -> StoreResult<Bson> {
    Ok(bson::to_bson(at)?)
}

/// Matches the expected booking count, treating a missing counter on an
/// old record as zero.
fn booking_count_filter(expected: i64) -> Document {
    if expected == 0 {
        doc! { "$or": [ { "totalBookings": 0 }, { "totalBookings": { "$exists": false } } ] }
    } else {
        doc! { "totalBookings": expected }
    }
}

/// Reactivation update. A renewed membership drops any earlier cancellation
/// date.
fn checkout_update(full_name: &str, phone: &str, terms: &MembershipTerms) -> StoreResult<Document> {
    Ok(doc! {
        "$set": {
            "fullName": full_name,
            "phone": phone,
            "plan": terms.plan.as_str(),
            "status": MemberStatus::Active.as_str(),
            "discountPercentage": terms.discount_percentage,
            "hasFirstBookingOffer": terms.has_first_booking_offer,
            "purchaseDate": time(&terms.purchase_date)?,
            "renewalDate": time(&terms.renewal_date)?,
            "schemaVersion": MEMBER_SCHEMA_VERSION,
        },
        "$unset": { "cancelledAt": "" }
    })
}

/// Values written into fields an older record lacks. Covers the fields
/// without serde defaults too, otherwise such a record cannot be decoded.
fn backfill_defaults(now: DateTime<Utc>) -> StoreResult<Vec<(&'static str, Bson)>> {
    Ok(vec![
        ("fullName", Bson::from("")),
        ("phone", Bson::from("")),
        ("createdAt", time(&now)?),
        ("status", Bson::from(MemberStatus::Inactive.as_str())),
        ("discountPercentage", Bson::Int32(0)),
        ("hasFirstBookingOffer", Bson::Boolean(false)),
        ("totalBookings", Bson::Int64(0)),
        ("totalSavings", Bson::Double(0.0)),
    ])
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Member>> {
        let filter = doc! { "email": email };
        Ok(self.collection.find_one(filter, None).await?)
    }

    async fn insert(&self, mut member: Member) -> StoreResult<Member> {
        if self.find_by_email(&member.email).await?.is_some() {
            return Err(StoreError::Duplicate(member.email));
        }

        let result = self.collection.insert_one(&member, None).await?;
        member.id = result.inserted_id.as_object_id();
        Ok(member)
    }

    async fn apply_checkout(
        &self,
        email: &str,
        full_name: &str,
        phone: &str,
        terms: &MembershipTerms,
    ) -> StoreResult<bool> {
        let filter = doc! { "email": email };
        let update = checkout_update(full_name, phone, terms)?;

        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn settle_booking(
        &self,
        email: &str,
        settlement: &BookingSettlement,
    ) -> StoreResult<bool> {
        let mut filter = doc! {
            "email": email,
            "status": MemberStatus::Active.as_str(),
        };
        for (key, value) in booking_count_filter(settlement.expected_total_bookings) {
            filter.insert(key, value);
        }

        let mut update = doc! {
            "$inc": {
                "totalBookings": 1_i64,
                "totalSavings": settlement.savings,
            }
        };
        if settlement.consume_offer {
            update.insert("$set", doc! { "hasFirstBookingOffer": false });
        }

        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.modified_count > 0)
    }

    async fn revert_settlement(
        &self,
        email: &str,
        settlement: &BookingSettlement,
    ) -> StoreResult<()> {
        let filter = doc! { "email": email };
        let mut update = doc! {
            "$inc": {
                "totalBookings": -1_i64,
                "totalSavings": -settlement.savings,
            }
        };
        if settlement.consume_offer {
            update.insert("$set", doc! { "hasFirstBookingOffer": true });
        }

        self.collection.update_one(filter, update, None).await?;
        Ok(())
    }

    async fn cancel(&self, email: &str, at: DateTime<Utc>) -> StoreResult<bool> {
        let filter = doc! { "email": email };
        let update = doc! {
            "$set": {
                "status": MemberStatus::Cancelled.as_str(),
                "cancelledAt": time(&at)?,
            }
        };

        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn update_profile(
        &self,
        email: &str,
        update: ProfileUpdate<'_>,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let filter = doc! { "email": email };

        let mut update_fields = doc! { "updatedAt": time(&at)? };
        if let Some(full_name) = update.full_name {
            update_fields.insert("fullName", full_name);
        }
        if let Some(phone) = update.phone {
            update_fields.insert("phone", phone);
        }

        let result = self
            .collection
            .update_one(filter, doc! { "$set": update_fields }, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn list(&self) -> StoreResult<Vec<Member>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect::<Vec<Member>>().await?)
    }

    async fn backfill_schema(&self) -> StoreResult<u64> {
        let mut touched = 0;
        for (field, value) in backfill_defaults(Utc::now())? {
            let filter = doc! { field: { "$exists": false } };
            let update = doc! { "$set": { field: value } };
            touched += self.collection.update_many(filter, update, None).await?.modified_count;
        }

        let outdated = doc! {
            "$or": [
                { "schemaVersion": { "$exists": false } },
                { "schemaVersion": { "$lt": MEMBER_SCHEMA_VERSION } },
            ]
        };
        let update = doc! { "$set": { "schemaVersion": MEMBER_SCHEMA_VERSION } };
        touched += self.collection.update_many(outdated, update, None).await?.modified_count;

        tracing::info!(touched, "member schema backfill finished");
        Ok(touched)
    }
}
