use emp_common::ObjectIdError;
use thiserror::Error;

use crate::{emp_api::PaymentGatewayError, traits::StoreError};

/// The fan-out could not look up the vendors for a need. Bids written before the failure are kept.
#[derive(Debug, Clone, Error)]
pub enum MatchingError {
    #[error("Could not fetch vendors for need {need}: {reason}")]
    VendorLookupFailed { need: String, reason: String },
}

#[derive(Debug, Clone, Error)]
#[error("Vendor notification failed: {0}")]
pub struct NotificationError(pub String);

#[derive(Debug, Clone, Error)]
pub enum EventFlowError {
    #[error("Invalid id. {0}")]
    InvalidId(#[from] ObjectIdError),
    #[error("Coordinator {0} does not exist")]
    CoordinatorNotFound(String),
    #[error("Event {0} does not exist")]
    EventNotFound(String),
    #[error("Event {0} has already been paid for")]
    AlreadyPaid(String),
    #[error("Could not prepare the payment. {0}")]
    Payment(#[from] PaymentGatewayError),
    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum DirectoryApiError {
    #[error("Vendor {0} is not a registered user")]
    VendorNotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] StoreError),
}
