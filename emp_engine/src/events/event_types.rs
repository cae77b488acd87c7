use serde::{Deserialize, Serialize};

use crate::{
    db_types::Event,
    emp_api::{NewEventNotice, VendorBidPair},
};

/// Published once an event has been persisted, before vendor matching runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCreatedEvent {
    pub event: Event,
}

impl EventCreatedEvent {
    pub fn new(event: Event) -> Self {
        Self { event }
    }
}

/// Published when a coordinator has changed an event's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventUpdatedEvent {
    pub event: Event,
}

impl EventUpdatedEvent {
    pub fn new(event: Event) -> Self {
        Self { event }
    }
}

/// Published when the fan-out has created bids and the matched vendors should be told about the new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidsRequestedEvent {
    pub notice: NewEventNotice,
}

impl BidsRequestedEvent {
    pub fn new(notice: NewEventNotice) -> Self {
        Self { notice }
    }

    pub fn vendor_bids(&self) -> &[VendorBidPair] {
        &self.notice.vendor_bids
    }
}
