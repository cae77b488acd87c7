use serde::{Deserialize, Serialize};

use crate::db_types::ServiceBid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertBidResult {
    Inserted(ServiceBid),
    /// A bid with the same dedupe key exists. The key is returned.
    AlreadyExists(String),
}
