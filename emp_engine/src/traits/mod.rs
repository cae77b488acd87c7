//! #  Database management and control.
//!
//! This module defines the interface contracts of the marketplace engine database *backends*.
//!
//! * [`UserStore`] stores coordinators. Event creation needs them to validate the request and to fill in the payment
//!   redirect.
//! * [`EventStore`] stores events and their payment state.
//! * [`VendorDirectory`] stores vendor onboarding profiles, and answers the question "who can supply this need?".
//! * [`BidStore`] stores the pending bids created by the fan-out.
//! * [`MarketplaceDatabase`] ties them all together.
mod bid_store;
mod data_objects;
mod event_store;
mod marketplace_database;
mod user_store;
mod vendor_directory;

pub use bid_store::BidStore;
pub use data_objects::InsertBidResult;
pub use event_store::EventStore;
pub use marketplace_database::{MarketplaceDatabase, StoreError};
pub use user_store::UserStore;
pub use vendor_directory::VendorDirectory;
