use chrono::{DateTime, NaiveDate, Utc};
use emp_common::ObjectId;

use crate::{
    db_types::{Event, EventSearch, EventUpdate, NewEvent, PaymentStatus},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait EventStore {
    /// Persists a new event with a `pending` payment status.
    async fn insert_event(&self, event: NewEvent) -> Result<Event, StoreError>;

    async fn fetch_event(&self, id: &ObjectId) -> Result<Option<Event>, StoreError>;

    /// All the events created by the given coordinator, oldest first.
    async fn fetch_events_for_coordinator(&self, coordinator_id: &ObjectId) -> Result<Vec<Event>, StoreError>;

    /// Every paid event, oldest first.
    async fn fetch_paid_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Paid events dated on or after `from`, soonest first. At most `limit` events are returned.
    async fn fetch_upcoming_paid_events(&self, from: NaiveDate, limit: u32) -> Result<Vec<Event>, StoreError>;

    async fn search_events(&self, search: &EventSearch) -> Result<Vec<Event>, StoreError>;

    /// Applies the update to the event's descriptive fields.
    ///
    /// Returns [`StoreError::NotFound`] if the event does not exist.
    async fn update_event_details(&self, id: &ObjectId, update: EventUpdate) -> Result<Event, StoreError>;

    /// Records a change in the event's payment state. `paid_at` is only meaningful for the `paid` status.
    ///
    /// Returns [`StoreError::NotFound`] if the event does not exist.
    async fn update_event_payment(
        &self,
        id: &ObjectId,
        status: PaymentStatus,
        reference: Option<String>,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Event, StoreError>;
}
