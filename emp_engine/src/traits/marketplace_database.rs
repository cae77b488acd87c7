use thiserror::Error;

use crate::traits::{BidStore, EventStore, UserStore, VendorDirectory};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) error: {0}")]
    DatabaseError(String),
    #[error("Could not (de)serialize a stored document: {0}")]
    SerializationError(String),
    #[error("The requested {0} does not exist")]
    NotFound(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::SerializationError(e.to_string())
    }
}

/// The full set of behaviour a backend needs to support the marketplace engine.
#[allow(async_fn_in_trait)]
pub trait MarketplaceDatabase: Clone + UserStore + EventStore + VendorDirectory + BidStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Close all connections to the database.
    async fn close(&mut self) -> Result<(), StoreError>;
}
