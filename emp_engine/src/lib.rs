//! Event Marketplace Engine
//!
//! The engine takes an event creation request from a coordinator, stores the event, prepares the payment redirect for
//! the platform fee, and fans the event's service needs out to every vendor who can supply them, as pending bids.
//!
//! The library is divided into these main sections:
//! 1. Request analysis ([`mod@matching`]). Pure functions that turn the nested service sections of a request into a
//!    de-duplicated list of category needs.
//! 2. Database management and control ([`mod@traits`] and the SQLite backend). You should never need to access the
//!    database directly. Instead, use the public API provided by the engine. The data types stored in the database
//!    are defined in [`mod@db_types`] and are public.
//! 3. The engine public API ([`mod@emp_api`]): event creation and payment follow-up, vendor matching, and the vendor
//!    and user directory.
//!
//! The engine also provides a set of events that can be subscribed to ([`mod@events`]). When an event is created, an
//! `EventCreatedEvent` is emitted, and when vendors have been asked to bid, a `BidsRequestedEvent` is emitted.
pub mod db_types;
pub mod emp_api;
pub mod events;
pub mod helpers;
pub mod matching;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use emp_api::{
    DirectoryApi,
    DirectoryApiError,
    EventFlowApi,
    EventFlowError,
    EventFlowOptions,
    MatchingError,
    VendorMatchingApi,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{BidStore, EventStore, InsertBidResult, MarketplaceDatabase, StoreError, UserStore, VendorDirectory};
