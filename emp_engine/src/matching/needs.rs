use std::fmt::Display;

use emp_common::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db_types::{BidType, PaidBy};

/// A single service requirement extracted from an event creation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNeed {
    pub main_category_id: ObjectId,
    pub sub_category_id: Option<ObjectId>,
    pub leaf_category_id: Option<ObjectId>,
}

impl CategoryNeed {
    pub fn new(main: ObjectId, sub: Option<ObjectId>, leaf: Option<ObjectId>) -> Self {
        Self { main_category_id: main, sub_category_id: sub, leaf_category_id: leaf }
    }

    /// A venue need only names a main category.
    pub fn venue(main: ObjectId) -> Self {
        Self::new(main, None, None)
    }

    /// The equality key used for de-duplication, `main:sub:leaf`, with `null` standing in for missing parts.
    pub fn key(&self) -> String {
        let part = |id: &Option<ObjectId>| id.as_ref().map_or("null", ObjectId::as_str).to_string();
        format!("{}:{}:{}", self.main_category_id, part(&self.sub_category_id), part(&self.leaf_category_id))
    }
}

impl Display for CategoryNeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// The bid type and payment responsibility fixed by the part of the request a need came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BidGroup {
    pub bid_type: BidType,
    pub paid_by: PaidBy,
}

impl BidGroup {
    pub const SERVICE: BidGroup = BidGroup { bid_type: BidType::Service, paid_by: PaidBy::Coordinator };
    pub const STALL: BidGroup = BidGroup { bid_type: BidType::Stall, paid_by: PaidBy::Vendor };
    pub const VENUE: BidGroup = BidGroup { bid_type: BidType::Venue, paid_by: PaidBy::Coordinator };
}

/// A de-duplicated need, tagged with the bid group it will be fanned out under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedNeed {
    pub need: CategoryNeed,
    pub group: BidGroup,
}

impl PlannedNeed {
    pub fn new(need: CategoryNeed, group: BidGroup) -> Self {
        Self { need, group }
    }
}
