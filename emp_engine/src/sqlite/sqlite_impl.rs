//! `SqliteDatabase` is a concrete implementation of a marketplace engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module. Vendor profiles are kept as JSON documents, and the main-category pre-filter is pushed down to SQLite with
//! `json_each`.
use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, Utc};
use emp_common::ObjectId;
use log::*;
use sqlx::SqlitePool;

use super::db::{bids, db_url, events, new_pool, users, vendors};
use crate::{
    db_types::{
        Event,
        EventSearch,
        EventUpdate,
        NewEvent,
        NewServiceBid,
        NewUser,
        PaymentStatus,
        ServiceBid,
        User,
        VendorProfile,
    },
    traits::{BidStore, EventStore, InsertBidResult, MarketplaceDatabase, StoreError, UserStore, VendorDirectory},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl MarketplaceDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}

impl UserStore for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::insert_user(user, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::fetch_user(id, &mut conn).await?;
        Ok(user)
    }
}

impl EventStore for SqliteDatabase {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let event = events::insert_event(event, &mut conn).await?;
        Ok(event)
    }

    async fn fetch_event(&self, id: &ObjectId) -> Result<Option<Event>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let event = events::fetch_event(id, &mut conn).await?;
        Ok(event)
    }

    async fn fetch_events_for_coordinator(&self, coordinator_id: &ObjectId) -> Result<Vec<Event>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let events = events::fetch_events_for_coordinator(coordinator_id, &mut conn).await?;
        Ok(events)
    }

    async fn fetch_paid_events(&self) -> Result<Vec<Event>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let events = events::fetch_events_with_payment_status(PaymentStatus::Paid, &mut conn).await?;
        Ok(events)
    }

    async fn fetch_upcoming_paid_events(&self, from: NaiveDate, limit: u32) -> Result<Vec<Event>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let events = events::fetch_upcoming_paid_events(from, limit, &mut conn).await?;
        Ok(events)
    }

    async fn search_events(&self, search: &EventSearch) -> Result<Vec<Event>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let events = events::search_events(search, &mut conn).await?;
        trace!("🗃️ {} events match {search:?}", events.len());
        Ok(events)
    }

    async fn update_event_details(&self, id: &ObjectId, update: EventUpdate) -> Result<Event, StoreError> {
        let mut conn = self.pool.acquire().await?;
        events::update_details(id, update, &mut conn).await?.ok_or_else(|| StoreError::NotFound(format!("event {id}")))
    }

    async fn update_event_payment(
        &self,
        id: &ObjectId,
        status: PaymentStatus,
        reference: Option<String>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Event, StoreError> {
        let mut conn = self.pool.acquire().await?;
        events::update_payment(id, status, reference, paid_at, &mut conn)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("event {id}")))
    }
}

impl VendorDirectory for SqliteDatabase {
    async fn save_vendor_profile(&self, profile: VendorProfile) -> Result<VendorProfile, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let profile = vendors::upsert_vendor_profile(profile, &mut conn).await?;
        Ok(profile)
    }

    async fn fetch_vendor_profile(&self, vendor_id: &ObjectId) -> Result<Option<VendorProfile>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let profile = vendors::fetch_vendor_profile(vendor_id, &mut conn).await?;
        Ok(profile)
    }

    async fn vendors_offering_main_category(
        &self,
        main_category_id: &ObjectId,
    ) -> Result<Vec<VendorProfile>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let vendors = vendors::fetch_vendors_with_main_category(main_category_id, &mut conn).await?;
        trace!("🗃️ {} vendors offer main category {main_category_id}", vendors.len());
        Ok(vendors)
    }
}

impl BidStore for SqliteDatabase {
    async fn insert_bid(&self, bid: NewServiceBid) -> Result<InsertBidResult, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = bids::idempotent_insert(bid, &mut conn).await?;
        Ok(result)
    }

    async fn fetch_bids_for_event(&self, event_id: &ObjectId) -> Result<Vec<ServiceBid>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let bids = bids::fetch_bids_for_event(event_id, &mut conn).await?;
        Ok(bids)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
