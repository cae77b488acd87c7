use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;
use uuid::Uuid;

pub const MAX_OBJECT_ID_LEN: usize = 64;

//--------------------------------------      ObjectId       ---------------------------------------------------------
/// The canonical identifier for every record in the platform (users, events, categories, bids).
///
/// Freshly generated ids are UUIDv7s in their 32 character lowercase hex form. The leading 48 bits are the unix
/// timestamp in milliseconds, so they sort by creation time. Ids received from clients only need to be well-formed
/// tokens (see [`ObjectId::from_str`]), since category ids are minted by the service catalogue, not by us.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    #[error("An id cannot be empty")]
    Empty,
    #[error("Id is longer than {MAX_OBJECT_ID_LEN} characters")]
    TooLong,
    #[error("Id contains an invalid character: {0:?}")]
    InvalidCharacter(char),
    #[error("Expected a string id, but got {0}")]
    NotAString(String),
}

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), ObjectIdError> {
        if s.is_empty() {
            return Err(ObjectIdError::Empty);
        }
        if s.len() > MAX_OBJECT_ID_LEN {
            return Err(ObjectIdError::TooLong);
        }
        match s.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_')) {
            Some(c) => Err(ObjectIdError::InvalidCharacter(c)),
            None => Ok(()),
        }
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl TryFrom<&serde_json::Value> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            other => Err(ObjectIdError::NotAString(other.to_string())),
        }
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
