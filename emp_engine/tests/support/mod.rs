#![allow(dead_code)]
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use emp_common::{ObjectId, Secret, Zar};
use emp_engine::{
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
        VendorService,
        VendorSubCategory,
    },
    emp_api::{NewEventNotice, NotificationError, PaymentGateway, RedirectGateway, VendorNotifier},
    test_utils::prepare_env::fresh_database,
    BidStore,
    EventStore,
    InsertBidResult,
    MarketplaceDatabase,
    SqliteDatabase,
    StoreError,
    UserStore,
    VendorDirectory,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub fn id(s: &str) -> ObjectId {
    s.parse().expect("Invalid test id")
}

pub async fn setup() -> SqliteDatabase {
    fresh_database().await
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Failed to remove database {url}: {e}");
    }
}

pub async fn add_coordinator(db: &SqliteDatabase, coordinator_id: &str) -> User {
    let user = NewUser::new("Thandi", "Mokoena", "thandi@example.com").with_id(id(coordinator_id));
    db.insert_user(user).await.expect("Error inserting coordinator")
}

pub async fn add_vendor(db: &SqliteDatabase, vendor_id: &str, services: Vec<VendorService>) -> VendorProfile {
    let user = NewUser::new("Sipho", "Dlamini", "sipho@example.com").with_id(id(vendor_id));
    db.insert_user(user).await.expect("Error inserting vendor");
    db.save_vendor_profile(VendorProfile::new(id(vendor_id), services)).await.expect("Error saving vendor profile")
}

/// Stores a bare event for the coordinator, so that bids have something to point at.
pub async fn add_event(db: &SqliteDatabase, coordinator_id: &str, title: &str) -> Event {
    let event = NewEvent {
        id: ObjectId::new(),
        user_id: id(coordinator_id),
        title: title.to_string(),
        event_description: Some("An evening of jazz".to_string()),
        date: Some("2026-12-05".to_string()),
        city: Some("Cape Town".to_string()),
        location: None,
        is_event_venue: true,
        venue_service_id: None,
        service_price: Zar::from_rands(1000),
        admin_fee: Zar::from_rands(500),
        details: serde_json::json!({}),
    };
    db.insert_event(event).await.expect("Error inserting event")
}

/// A service in main category `main` with a single active sub category `sub`.
pub fn active_service(main: &str, sub: &str) -> VendorService {
    VendorService::new(id(main)).with_sub_category(VendorSubCategory::new(id(sub), true))
}

pub fn test_gateway() -> Arc<dyn PaymentGateway> {
    Arc::new(RedirectGateway::new(
        "https://sandbox.payfast.co.za/eng/process",
        "10000100",
        Secret::new("46f0cd694581a".to_string()),
    ))
}

/// Remembers every notice it receives. Can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub notices: Arc<Mutex<Vec<NewEventNotice>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn notices(&self) -> Vec<NewEventNotice> {
        self.notices.lock().expect("poisoned").clone()
    }
}

impl VendorNotifier for RecordingNotifier {
    async fn notify_vendors_for_new_event(&self, notice: NewEventNotice) -> Result<(), NotificationError> {
        self.notices.lock().expect("poisoned").push(notice);
        if self.fail {
            Err(NotificationError("the mail server is on fire".into()))
        } else {
            Ok(())
        }
    }
}

/// A real database whose vendor lookups fail for one main category.
#[derive(Debug, Clone)]
pub struct BrokenDirectory {
    pub db: SqliteDatabase,
    pub broken_main_category: ObjectId,
}

impl BrokenDirectory {
    pub fn new(db: SqliteDatabase, broken_main_category: &str) -> Self {
        Self { db, broken_main_category: id(broken_main_category) }
    }
}

impl UserStore for BrokenDirectory {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.db.insert_user(user).await
    }

    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        self.db.fetch_user(id).await
    }
}

impl EventStore for BrokenDirectory {
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError> {
        self.db.insert_event(event).await
    }

    async fn fetch_event(&self, id: &ObjectId) -> Result<Option<Event>, StoreError> {
        self.db.fetch_event(id).await
    }

    async fn fetch_events_for_coordinator(&self, coordinator_id: &ObjectId) -> Result<Vec<Event>, StoreError> {
        self.db.fetch_events_for_coordinator(coordinator_id).await
    }

    async fn fetch_paid_events(&self) -> Result<Vec<Event>, StoreError> {
        self.db.fetch_paid_events().await
    }

    async fn fetch_upcoming_paid_events(&self, from: NaiveDate, limit: u32) -> Result<Vec<Event>, StoreError> {
        self.db.fetch_upcoming_paid_events(from, limit).await
    }

    async fn search_events(&self, search: &EventSearch) -> Result<Vec<Event>, StoreError> {
        self.db.search_events(search).await
    }

    async fn update_event_details(&self, id: &ObjectId, update: EventUpdate) -> Result<Event, StoreError> {
        self.db.update_event_details(id, update).await
    }

    async fn update_event_payment(
        &self,
        id: &ObjectId,
        status: PaymentStatus,
        reference: Option<String>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Event, StoreError> {
        self.db.update_event_payment(id, status, reference, paid_at).await
    }
}

impl VendorDirectory for BrokenDirectory {
    async fn save_vendor_profile(&self, profile: VendorProfile) -> Result<VendorProfile, StoreError> {
        self.db.save_vendor_profile(profile).await
    }

    async fn fetch_vendor_profile(&self, vendor_id: &ObjectId) -> Result<Option<VendorProfile>, StoreError> {
        self.db.fetch_vendor_profile(vendor_id).await
    }

    async fn vendors_offering_main_category(
        &self,
        main_category_id: &ObjectId,
    ) -> Result<Vec<VendorProfile>, StoreError> {
        if *main_category_id == self.broken_main_category {
            return Err(StoreError::DatabaseError("the vendor directory is unavailable".into()));
        }
        self.db.vendors_offering_main_category(main_category_id).await
    }
}

impl BidStore for BrokenDirectory {
    async fn insert_bid(&self, bid: NewServiceBid) -> Result<InsertBidResult, StoreError> {
        self.db.insert_bid(bid).await
    }

    async fn fetch_bids_for_event(&self, event_id: &ObjectId) -> Result<Vec<ServiceBid>, StoreError> {
        self.db.fetch_bids_for_event(event_id).await
    }
}
