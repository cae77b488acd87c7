use std::fmt::Debug;

use emp_common::ObjectId;
use log::*;

use crate::{
    db_types::NewServiceBid,
    emp_api::{BidFailure, BidIdempotency, FanOutSummary, MatchingError, NewEventNotice, VendorNotifier},
    events::EventProducers,
    helpers::bid_dedupe_key,
    matching::{plan_needs, EventCreationRequest, PlannedNeed},
    traits::{BidStore, InsertBidResult, VendorDirectory},
};

/// `VendorMatchingApi` runs the bid fan-out for a freshly created event: every need in the request is matched against
/// the vendor directory, and each matching vendor gets a pending bid.
pub struct VendorMatchingApi<B, N = EventProducers> {
    db: B,
    notifier: N,
    idempotency: BidIdempotency,
}

impl<B, N> Debug for VendorMatchingApi<B, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VendorMatchingApi ({:?})", self.idempotency)
    }
}

impl<B, N> VendorMatchingApi<B, N> {
    pub fn new(db: B, notifier: N) -> Self {
        Self { db, notifier, idempotency: BidIdempotency::default() }
    }

    pub fn with_idempotency(mut self, idempotency: BidIdempotency) -> Self {
        self.idempotency = idempotency;
        self
    }

    pub fn idempotency(&self) -> BidIdempotency {
        self.idempotency
    }
}

impl<B, N> VendorMatchingApi<B, N>
where
    B: VendorDirectory + BidStore,
    N: VendorNotifier,
{
    /// Extracts the needs from `request`, and writes one pending bid per (need, matching vendor) pair for the event.
    ///
    /// Needs are processed one at a time, in the order produced by [`plan_needs`]. A bid that cannot be written is
    /// logged and recorded in the summary, and the fan-out moves on. If the vendor lookup for a need fails, the
    /// fan-out stops and a [`MatchingError`] is returned. Bids already written stay written.
    ///
    /// If any bids were written, the notifier is called once with the full list of (vendor, bid) pairs. A notifier
    /// failure is logged and does not fail the fan-out.
    pub async fn run_vendor_matching(
        &self,
        request: &EventCreationRequest,
        event_id: &ObjectId,
        coordinator_id: &ObjectId,
    ) -> Result<FanOutSummary, MatchingError> {
        let plan = plan_needs(request);
        let mut summary = FanOutSummary { needs: plan.len(), ..Default::default() };
        for planned in &plan {
            self.fan_out_need(planned, event_id, coordinator_id, &mut summary).await?;
        }
        info!(
            "🔄️ Vendor matching for event {event_id} complete. {} needs, {} bids created, {} duplicates skipped, {} \
             failures",
            summary.needs,
            summary.bids.len(),
            summary.skipped_duplicates,
            summary.failures.len()
        );
        summary.notified = self.notify_vendors(request, event_id, &summary).await;
        Ok(summary)
    }

    async fn fan_out_need(
        &self,
        planned: &PlannedNeed,
        event_id: &ObjectId,
        coordinator_id: &ObjectId,
        summary: &mut FanOutSummary,
    ) -> Result<(), MatchingError> {
        let need = &planned.need;
        let vendors = self.db.find_vendors_for_need(need).await.map_err(|e| {
            error!("🔄️ Vendor lookup for need {need} failed. Aborting the fan-out for event {event_id}. {e}");
            MatchingError::VendorLookupFailed { need: need.key(), reason: e.to_string() }
        })?;
        if vendors.is_empty() {
            debug!("🔄️ No vendors offer {need} ({})", planned.group.bid_type);
            return Ok(());
        }
        trace!("🔄️ {} vendors offer {need}", vendors.len());
        for vendor in vendors {
            let group = planned.group;
            let mut bid = NewServiceBid::pending(
                event_id.clone(),
                coordinator_id.clone(),
                vendor.user_id.clone(),
                need,
                group.bid_type,
                group.paid_by,
            )
            .with_image_urls(vendor.image_urls_for(&need.main_category_id));
            if self.idempotency.is_enabled() {
                bid = bid.with_dedupe_key(bid_dedupe_key(event_id, &vendor.user_id, group.bid_type, need));
            }
            match self.db.insert_bid(bid).await {
                Ok(InsertBidResult::Inserted(bid)) => summary.bids.push(bid),
                Ok(InsertBidResult::AlreadyExists(_)) => summary.skipped_duplicates += 1,
                Err(e) => {
                    error!("🔄️ Could not create a bid on {need} for vendor {}. {e}", vendor.user_id);
                    summary.failures.push(BidFailure {
                        vendor_id: vendor.user_id,
                        need: need.clone(),
                        reason: e.to_string(),
                    });
                },
            }
        }
        Ok(())
    }

    async fn notify_vendors(
        &self,
        request: &EventCreationRequest,
        event_id: &ObjectId,
        summary: &FanOutSummary,
    ) -> bool {
        let vendor_bids = summary.vendor_bid_pairs();
        if vendor_bids.is_empty() {
            debug!("📬️ No new bids for event {event_id}. Nobody to notify.");
            return false;
        }
        let notice = NewEventNotice {
            event_id: event_id.clone(),
            title: request.title.clone(),
            event_description: request.event_description.clone(),
            date: request.date.clone(),
            vendor_bids,
        };
        match self.notifier.notify_vendors_for_new_event(notice).await {
            Ok(()) => {
                debug!("📬️ Vendors notified about event {event_id}");
                true
            },
            Err(e) => {
                error!("📬️ Could not notify vendors about event {event_id}. {e}");
                false
            },
        }
    }
}
