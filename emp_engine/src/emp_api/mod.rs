//! # Event marketplace engine public API
//!
//! The `emp_api` module exposes the programmatic API for the marketplace engine.
//!
//! * [`event_flow_api`] is the primary API for coordinators. It creates and updates events, kicks off the vendor
//!   fan-out, manages the event's payment redirect, and lists and searches events.
//! * [`vendor_matching_api`] runs the vendor fan-out on its own, given an event creation request.
//! * [`directory_api`] registers users and manages vendor service profiles.
//!
//! The remaining submodules hold supporting types and the notifier and payment gateway seams.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use emp_engine::{DirectoryApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/emp_store.db", 5).await?;
//! let api = DirectoryApi::new(db);
//! let profile = api.fetch_vendor_profile(&vendor_id).await?;
//! ```
pub mod directory_api;
mod errors;
pub mod event_flow_api;
pub mod event_objects;
mod matching_objects;
mod notifier;
pub mod payments;
pub mod vendor_matching_api;

pub use directory_api::DirectoryApi;
pub use errors::{DirectoryApiError, EventFlowError, MatchingError, NotificationError};
pub use event_flow_api::EventFlowApi;
pub use event_objects::{
    EventCreated,
    EventFlowOptions,
    EventPaymentSummary,
    PaymentDetails,
    RetryPaymentRequest,
    RetryPaymentResult,
};
pub use matching_objects::{BidFailure, BidIdempotency, FanOutSummary, NewEventNotice, VendorBidPair};
pub use notifier::VendorNotifier;
pub use payments::{PaymentGateway, PaymentGatewayError, PaymentRequest, RedirectGateway};
pub use vendor_matching_api::VendorMatchingApi;
