//! Record types that are stored in, and read from, the marketplace database.
//!
//! The JSON representation of these types follows the field naming the front end already uses (camelCase, with the
//! odd legacy snake_case field such as `payment_status` on bids).
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use emp_common::{ObjectId, Zar};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use thiserror::Error;

use crate::matching::CategoryNeed;

#[derive(Debug, Clone, Error)]
#[error("Invalid value for {kind}: {value}")]
pub struct ConversionError {
    kind: &'static str,
    value: String,
}

impl ConversionError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

// Generates Display, FromStr and a lenient From<String> for the simple lower-case string enums below.
macro_rules! string_enum {
    ($name:ident, $default:ident, { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $s),)+
                }
            }
        }

        impl FromStr for $name {
            type Err = ConversionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    s => Err(ConversionError::new(stringify!($name), s)),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                value.parse().unwrap_or_else(|_| {
                    error!("Invalid {}: {value}. But this conversion cannot fail. Defaulting to {}", stringify!($name), Self::$default);
                    Self::$default
                })
            }
        }
    };
}

//--------------------------------------        BidType        ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BidType {
    /// A regular service need extracted from one of the event's service sections.
    Service,
    /// A vendor stall (food, accessories, arts & crafts, vape). The vendor pays for the spot.
    Stall,
    /// The coordinator needs a venue.
    Venue,
}

string_enum!(BidType, Service, { Service => "service", Stall => "stall", Venue => "venue" });

//--------------------------------------         PaidBy        ---------------------------------------------------------
/// Which party is responsible for paying once a bid is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaidBy {
    Coordinator,
    Vendor,
}

string_enum!(PaidBy, Coordinator, { Coordinator => "coordinator", Vendor => "vendor" });

//--------------------------------------       BidStatus       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    /// Freshly created by the fan-out. The vendor has not responded yet.
    Pending,
    Accepted,
    Rejected,
    Completed,
}

string_enum!(BidStatus, Pending, {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
    Completed => "completed",
});

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
/// Payment state for both events (the coordinator's platform fee) and bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

string_enum!(PaymentStatus, Pending, { Pending => "pending", Paid => "paid", Failed => "failed" });

//--------------------------------------          User         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl NewUser {
    pub fn new<S: Into<String>>(first_name: S, last_name: S, email: S) -> Self {
        Self { id: None, first_name: first_name.into(), last_name: last_name.into(), email: email.into() }
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }
}

//--------------------------------------         Event         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: ObjectId,
    /// The coordinator that created the event
    pub user_id: ObjectId,
    pub title: String,
    pub event_description: Option<String>,
    pub date: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub is_event_venue: bool,
    pub venue_service_id: Option<String>,
    pub service_price: Zar,
    pub admin_fee: Zar,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    /// The full creation request, service sections included, exactly as it was submitted.
    pub details: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Service price plus admin fee. `None` if the sum does not fit.
    pub fn total_price(&self) -> Option<Zar> {
        self.service_price.checked_add(self.admin_fee)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub title: String,
    pub event_description: Option<String>,
    pub date: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
    pub is_event_venue: bool,
    pub venue_service_id: Option<String>,
    pub service_price: Zar,
    pub admin_fee: Zar,
    pub details: serde_json::Value,
}

/// The descriptive fields a coordinator may change after the event was created. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub event_description: Option<String>,
    pub date: Option<String>,
    pub city: Option<String>,
    pub location: Option<String>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.event_description.is_none()
            && self.date.is_none()
            && self.city.is_none()
            && self.location.is_none()
    }
}

/// A free-text event search. Blank criteria are ignored, so an empty search returns every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSearch {
    /// Matched, case-insensitively, anywhere in the event's title or location.
    pub search_criteria: Option<String>,
    /// Only events in this city. Case-insensitive.
    pub city: Option<String>,
}

impl EventSearch {
    pub fn text(&self) -> Option<&str> {
        self.search_criteria.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

//--------------------------------------     VendorProfile     ---------------------------------------------------------
/// A vendor's onboarding record: the service categories they have declared they can supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub user_id: ObjectId,
    #[serde(rename = "service", default)]
    pub services: Vec<VendorService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorService {
    pub main_category_id: ObjectId,
    #[serde(default)]
    pub sub_categories: Vec<VendorSubCategory>,
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSubCategory {
    pub sub_category_id: ObjectId,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub leaf_categories: Vec<VendorLeafCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorLeafCategory {
    pub leaf_category_id: ObjectId,
    #[serde(default)]
    pub is_active: bool,
}

impl VendorProfile {
    pub fn new(user_id: ObjectId, services: Vec<VendorService>) -> Self {
        Self { user_id, services }
    }

    /// Returns true if this vendor can supply the given need.
    ///
    /// Matching is exact. One declared service must carry the need's main category and, when the need names a
    /// sub-category, that same service must list it as active. When the need also names a leaf category, the active
    /// sub-category must in turn list the leaf as active. A need with no sub-category (venues) matches on the main
    /// category alone.
    pub fn offers(&self, need: &CategoryNeed) -> bool {
        self.services.iter().filter(|s| s.main_category_id == need.main_category_id).any(|service| {
            let Some(sub_id) = &need.sub_category_id else {
                return true;
            };
            service.sub_categories.iter().filter(|sub| sub.is_active && &sub.sub_category_id == sub_id).any(|sub| {
                match &need.leaf_category_id {
                    None => true,
                    Some(leaf_id) => {
                        sub.leaf_categories.iter().any(|leaf| leaf.is_active && &leaf.leaf_category_id == leaf_id)
                    },
                }
            })
        })
    }

    /// The showcase images for the first declared service in the given main category.
    pub fn image_urls_for(&self, main_category_id: &ObjectId) -> Option<Vec<String>> {
        self.services.iter().find(|s| &s.main_category_id == main_category_id).map(|s| s.image_urls.clone())
    }
}

impl VendorService {
    pub fn new(main_category_id: ObjectId) -> Self {
        Self { main_category_id, sub_categories: vec![], image_urls: vec![] }
    }

    pub fn with_sub_category(mut self, sub: VendorSubCategory) -> Self {
        self.sub_categories.push(sub);
        self
    }

    pub fn with_image_url<S: Into<String>>(mut self, url: S) -> Self {
        self.image_urls.push(url.into());
        self
    }
}

impl VendorSubCategory {
    pub fn new(sub_category_id: ObjectId, is_active: bool) -> Self {
        Self { sub_category_id, is_active, leaf_categories: vec![] }
    }

    pub fn with_leaf(mut self, leaf_category_id: ObjectId, is_active: bool) -> Self {
        self.leaf_categories.push(VendorLeafCategory { leaf_category_id, is_active });
        self
    }
}

//--------------------------------------       ServiceBid      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceBid {
    pub id: ObjectId,
    pub event_id: ObjectId,
    pub main_category_id: ObjectId,
    pub sub_category_id: Option<ObjectId>,
    pub leaf_category_id: Option<ObjectId>,
    pub vendor_id: ObjectId,
    pub event_coordinator_id: ObjectId,
    pub status: BidStatus,
    pub price: Option<Zar>,
    #[serde(rename = "imageUrl")]
    pub image_urls: Option<Json<Vec<String>>>,
    pub bid_type: BidType,
    #[serde(rename = "payment_status")]
    pub payment_status: PaymentStatus,
    pub payment_reference: String,
    pub paid_by: PaidBy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedupe_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceBid {
    pub id: ObjectId,
    pub event_id: ObjectId,
    pub main_category_id: ObjectId,
    pub sub_category_id: Option<ObjectId>,
    pub leaf_category_id: Option<ObjectId>,
    pub vendor_id: ObjectId,
    pub event_coordinator_id: ObjectId,
    pub image_urls: Option<Vec<String>>,
    pub bid_type: BidType,
    pub paid_by: PaidBy,
    pub dedupe_key: Option<String>,
}

impl NewServiceBid {
    /// A pending, unpriced bid for `vendor_id` on the given need.
    pub fn pending(
        event_id: ObjectId,
        coordinator_id: ObjectId,
        vendor_id: ObjectId,
        need: &CategoryNeed,
        bid_type: BidType,
        paid_by: PaidBy,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            event_id,
            main_category_id: need.main_category_id.clone(),
            sub_category_id: need.sub_category_id.clone(),
            leaf_category_id: need.leaf_category_id.clone(),
            vendor_id,
            event_coordinator_id: coordinator_id,
            image_urls: None,
            bid_type,
            paid_by,
            dedupe_key: None,
        }
    }

    pub fn with_image_urls(mut self, urls: Option<Vec<String>>) -> Self {
        self.image_urls = urls;
        self
    }

    pub fn with_dedupe_key(mut self, key: String) -> Self {
        self.dedupe_key = Some(key);
        self
    }
}
