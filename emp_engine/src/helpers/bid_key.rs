use blake2::{digest::consts::U32, Blake2b, Digest};
use emp_common::ObjectId;

use crate::{db_types::BidType, matching::CategoryNeed};

type Blake2b256 = Blake2b<U32>;

/// A stable key identifying "this vendor was asked to bid on this need for this event".
///
/// The key is the hex encoded Blake2b-256 digest of
/// `event|vendor|bid_type|main|sub|leaf`, with `null` for missing category parts.
pub fn bid_dedupe_key(event_id: &ObjectId, vendor_id: &ObjectId, bid_type: BidType, need: &CategoryNeed) -> String {
    let part = |id: &Option<ObjectId>| id.as_ref().map_or("null", ObjectId::as_str).to_string();
    let preimage = format!(
        "{event_id}|{vendor_id}|{bid_type}|{}|{}|{}",
        need.main_category_id,
        part(&need.sub_category_id),
        part(&need.leaf_category_id)
    );
    hex::encode(Blake2b256::digest(preimage.as_bytes()))
}
