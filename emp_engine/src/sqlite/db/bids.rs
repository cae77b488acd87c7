use chrono::Utc;
use emp_common::ObjectId;
use log::{debug, trace};
use sqlx::{types::Json, SqliteConnection};

use crate::{
    db_types::{BidStatus, NewServiceBid, PaymentStatus, ServiceBid},
    traits::InsertBidResult,
};

/// Inserts a pending bid. If the bid has a dedupe key that is already taken, nothing is written.
pub async fn idempotent_insert(bid: NewServiceBid, conn: &mut SqliteConnection) -> Result<InsertBidResult, sqlx::Error> {
    let dedupe_key = bid.dedupe_key.clone();
    let now = Utc::now();
    let inserted: Option<ServiceBid> = sqlx::query_as::<_, ServiceBid>(
        r#"
            INSERT INTO service_bids (
                id,
                event_id,
                main_category_id,
                sub_category_id,
                leaf_category_id,
                vendor_id,
                event_coordinator_id,
                status,
                price,
                image_urls,
                bid_type,
                payment_status,
                payment_reference,
                paid_by,
                dedupe_key,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NULL, $9, $10, $11, '', $12, $13, $14, $14)
            ON CONFLICT (dedupe_key) DO NOTHING
            RETURNING *;
        "#,
    )
    .bind(bid.id)
    .bind(bid.event_id)
    .bind(bid.main_category_id)
    .bind(bid.sub_category_id)
    .bind(bid.leaf_category_id)
    .bind(bid.vendor_id)
    .bind(bid.event_coordinator_id)
    .bind(BidStatus::Pending)
    .bind(bid.image_urls.map(Json))
    .bind(bid.bid_type)
    .bind(PaymentStatus::Pending)
    .bind(bid.paid_by)
    .bind(bid.dedupe_key)
    .bind(now)
    .fetch_all(conn)
    .await?
    .pop();
    match (inserted, dedupe_key) {
        (Some(bid), _) => {
            trace!("🗃️ Bid {} for vendor {} saved", bid.id, bid.vendor_id);
            Ok(InsertBidResult::Inserted(bid))
        },
        (None, Some(key)) => {
            debug!("🗃️ A bid with key {key} already exists. Skipping.");
            Ok(InsertBidResult::AlreadyExists(key))
        },
        // Without a dedupe key there is nothing to conflict with, so an empty result means the row vanished.
        (None, None) => Err(sqlx::Error::RowNotFound),
    }
}

pub async fn fetch_bids_for_event(
    event_id: &ObjectId,
    conn: &mut SqliteConnection,
) -> Result<Vec<ServiceBid>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM service_bids WHERE event_id = $1 ORDER BY rowid")
        .bind(event_id)
        .fetch_all(conn)
        .await
}
