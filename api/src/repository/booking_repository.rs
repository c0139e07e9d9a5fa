use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};

use crate::models::booking::Booking;
use crate::repository::{BookingStore, StoreResult};

pub const BOOKINGS_COLLECTION: &str = "bookings";

pub struct BookingRepository {
    collection: Collection<Booking>,
}

impl BookingRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Booking>(BOOKINGS_COLLECTION);
        BookingRepository { collection }
    }

    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(false).build())
            .build();
        self.collection.create_index(index, None).await?;
        Ok(())
    }
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn insert(&self, mut booking: Booking) -> StoreResult<Booking> {
        let result = self.collection.insert_one(&booking, None).await?;
        booking.id = result.inserted_id.as_object_id();
        Ok(booking)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Vec<Booking>> {
        // ObjectIds grow with insertion time
        let options = FindOptions::builder().sort(doc! { "_id": -1 }).build();
        let cursor = self.collection.find(doc! { "email": email }, options).await?;
        Ok(cursor.try_collect::<Vec<Booking>>().await?)
    }

    async fn list(&self) -> StoreResult<Vec<Booking>> {
        let options = FindOptions::builder().sort(doc! { "_id": -1 }).build();
        let cursor = self.collection.find(None, options).await?;
        Ok(cursor.try_collect::<Vec<Booking>>().await?)
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.collection.count_documents(None, None).await?)
    }
}
