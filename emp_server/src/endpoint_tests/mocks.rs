use chrono::{DateTime, NaiveDate, Utc};
use emp_common::ObjectId;
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
    },
    traits::{BidStore, EventStore, InsertBidResult, StoreError, UserStore, VendorDirectory},
};
use mockall::mock;

mock! {
    pub MarketplaceStore {}
    impl Clone for MarketplaceStore {
        fn clone(&self) -> Self;
    }
    impl UserStore for MarketplaceStore {
        async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
        async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
    }
    impl EventStore for MarketplaceStore {
        async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError>;
        async fn fetch_event(&self, id: &ObjectId) -> Result<Option<Event>, StoreError>;
        async fn fetch_events_for_coordinator(&self, coordinator_id: &ObjectId) -> Result<Vec<Event>, StoreError>;
        async fn fetch_paid_events(&self) -> Result<Vec<Event>, StoreError>;
        async fn fetch_upcoming_paid_events(&self, from: NaiveDate, limit: u32) -> Result<Vec<Event>, StoreError>;
        async fn search_events(&self, search: &EventSearch) -> Result<Vec<Event>, StoreError>;
        async fn update_event_details(&self, id: &ObjectId, update: EventUpdate) -> Result<Event, StoreError>;
        async fn update_event_payment(
            &self,
            id: &ObjectId,
            status: PaymentStatus,
            reference: Option<String>,
            paid_at: Option<DateTime<Utc>>,
        ) -> Result<Event, StoreError>;
    }
    impl VendorDirectory for MarketplaceStore {
        async fn save_vendor_profile(&self, profile: VendorProfile) -> Result<VendorProfile, StoreError>;
        async fn fetch_vendor_profile(&self, vendor_id: &ObjectId) -> Result<Option<VendorProfile>, StoreError>;
        async fn vendors_offering_main_category(
            &self,
            main_category_id: &ObjectId,
        ) -> Result<Vec<VendorProfile>, StoreError>;
    }
    impl BidStore for MarketplaceStore {
        async fn insert_bid(&self, bid: NewServiceBid) -> Result<InsertBidResult, StoreError>;
        async fn fetch_bids_for_event(&self, event_id: &ObjectId) -> Result<Vec<ServiceBid>, StoreError>;
    }
}
