//! Turning an event creation request into a list of category needs.
//!
//! This module is pure: no I/O happens here. [`plan_needs`] is the entry point used by the fan-out in
//! [`crate::emp_api::VendorMatchingApi`].
mod dedupe;
mod extractor;
mod needs;
mod request;
mod service_tree;

pub use dedupe::dedupe_needs;
pub use extractor::{
    catering_need,
    extract_needs,
    extract_vendors_stalls_needs,
    plan_needs,
    stall_needs,
    venue_need,
    CATERING_KEY,
    STALLS_KEY,
    STALL_KINDS,
};
pub use needs::{BidGroup, CategoryNeed, PlannedNeed};
pub use request::{EventCreationRequest, SectionPayload, ServiceSection};
pub use service_tree::ServiceNode;
