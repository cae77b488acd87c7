use emp_common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{db_types::ServiceBid, matching::CategoryNeed};

/// Whether re-running the fan-out for the same event may create duplicate bids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidIdempotency {
    /// Every run writes a fresh set of bids.
    #[default]
    Disabled,
    /// Bids carry a dedupe key, and a bid that already exists for the same (event, vendor, bid type, need) is
    /// skipped.
    Enabled,
}

impl BidIdempotency {
    pub fn is_enabled(&self) -> bool {
        matches!(self, BidIdempotency::Enabled)
    }
}

impl From<bool> for BidIdempotency {
    fn from(enabled: bool) -> Self {
        if enabled {
            BidIdempotency::Enabled
        } else {
            BidIdempotency::Disabled
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBidPair {
    pub vendor_id: ObjectId,
    pub bid_id: ObjectId,
}

/// A bid that could not be written. The fan-out carries on after recording it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidFailure {
    pub vendor_id: ObjectId,
    pub need: CategoryNeed,
    pub reason: String,
}

/// What happened during one run of vendor matching for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FanOutSummary {
    /// The number of de-duplicated needs that were matched against the vendor directory.
    pub needs: usize,
    /// The bids written during this run, in creation order.
    pub bids: Vec<ServiceBid>,
    pub skipped_duplicates: usize,
    pub failures: Vec<BidFailure>,
    /// True if the notifier accepted the notice. False if there was nobody to notify, or notification failed.
    pub notified: bool,
}

impl FanOutSummary {
    pub fn vendor_bid_pairs(&self) -> Vec<VendorBidPair> {
        self.bids.iter().map(|b| VendorBidPair { vendor_id: b.vendor_id.clone(), bid_id: b.id.clone() }).collect()
    }
}

/// Everything a notifier needs to tell vendors about an event they have been invited to bid on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEventNotice {
    pub event_id: ObjectId,
    pub title: String,
    pub event_description: Option<String>,
    pub date: Option<String>,
    pub vendor_bids: Vec<VendorBidPair>,
}
