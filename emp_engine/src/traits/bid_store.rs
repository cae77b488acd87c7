use emp_common::ObjectId;

use crate::{
    db_types::{NewServiceBid, ServiceBid},
    traits::{InsertBidResult, StoreError},
};

#[allow(async_fn_in_trait)]
pub trait BidStore {
    /// Stores a new pending bid.
    ///
    /// If the bid carries a dedupe key and a bid with the same key already exists, nothing is written and
    /// [`InsertBidResult::AlreadyExists`] is returned. Bids without a key are always inserted.
    async fn insert_bid(&self, bid: NewServiceBid) -> Result<InsertBidResult, StoreError>;

    /// All bids for the event, in creation order.
    async fn fetch_bids_for_event(&self, event_id: &ObjectId) -> Result<Vec<ServiceBid>, StoreError>;
}
