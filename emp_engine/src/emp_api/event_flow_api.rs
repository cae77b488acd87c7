use std::{fmt::Debug, sync::Arc};

use chrono::Utc;
use emp_common::{ObjectId, Zar};
use log::*;

use crate::{
    db_types::{Event, EventSearch, EventUpdate, NewEvent, PaymentStatus, ServiceBid, User},
    emp_api::{
        BidIdempotency,
        EventCreated,
        EventFlowError,
        EventFlowOptions,
        EventPaymentSummary,
        PaymentDetails,
        PaymentGateway,
        PaymentGatewayError,
        PaymentRequest,
        RetryPaymentResult,
        VendorMatchingApi,
        VendorNotifier,
    },
    events::{EventCreatedEvent, EventProducers, EventUpdatedEvent},
    matching::EventCreationRequest,
    traits::{BidStore, EventStore, StoreError, UserStore, VendorDirectory},
};

/// The most events returned by [`EventFlowApi::fetch_upcoming_events`].
pub const UPCOMING_EVENTS_LIMIT: u32 = 10;

/// `EventFlowApi` is the primary API for coordinators: creating events (which triggers the vendor fan-out), and
/// following up on the event's payment.
pub struct EventFlowApi<B, N = EventProducers> {
    db: B,
    matching: VendorMatchingApi<B, N>,
    producers: EventProducers,
    gateway: Arc<dyn PaymentGateway>,
    options: EventFlowOptions,
}

impl<B, N> Debug for EventFlowApi<B, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventFlowApi ({:?}, {:?})", self.options, self.gateway)
    }
}

impl<B: Clone> EventFlowApi<B, EventProducers> {
    /// Creates a new API instance that notifies vendors through the `bids_requested` hook.
    pub fn new(db: B, producers: EventProducers, gateway: Arc<dyn PaymentGateway>, options: EventFlowOptions) -> Self {
        Self::with_notifier(db, producers.clone(), producers, gateway, options)
    }
}

impl<B: Clone, N> EventFlowApi<B, N> {
    pub fn with_notifier(
        db: B,
        notifier: N,
        producers: EventProducers,
        gateway: Arc<dyn PaymentGateway>,
        options: EventFlowOptions,
    ) -> Self {
        let matching = VendorMatchingApi::new(db.clone(), notifier);
        Self { db, matching, producers, gateway, options }
    }

    pub fn with_idempotency(mut self, idempotency: BidIdempotency) -> Self {
        self.matching = self.matching.with_idempotency(idempotency);
        self
    }

    pub fn matching(&self) -> &VendorMatchingApi<B, N> {
        &self.matching
    }
}

impl<B, N> EventFlowApi<B, N>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
    N: VendorNotifier,
{
    /// Creates a new event for the coordinator named in `request.user_id`.
    ///
    /// The coordinator must exist. The event is stored with a `pending` payment status, and a payment redirect URL for
    /// the total (service price plus admin fee) is generated. Then vendor matching runs for the event. A failure
    /// during vendor matching is logged and reported as a missing `fan_out` summary, but does not fail the call.
    pub async fn create_event(&self, request: EventCreationRequest) -> Result<EventCreated, EventFlowError> {
        let coordinator_id = request.user_id.parse::<ObjectId>()?;
        let coordinator = self.fetch_coordinator(&coordinator_id).await?;
        let service_price = request.service_price.unwrap_or_default();
        let admin_fee =
            request.admin_fee.filter(|fee| *fee != Zar::default()).unwrap_or(self.options.default_admin_fee);
        let total_price = checked_total(service_price, admin_fee)?;
        let event_id = ObjectId::new();
        let return_url = request.return_url.clone().unwrap_or_else(|| self.options.return_url(&event_id));
        let cancel_url = request.cancel_url.clone().unwrap_or_else(|| self.options.cancel_url(&event_id));
        let payment_url = self.payment_url(
            &event_id,
            total_price,
            &request.title,
            &coordinator,
            return_url,
            cancel_url,
        )?;
        let details = serde_json::to_value(&request).map_err(StoreError::from)?;
        let new_event = NewEvent {
            id: event_id,
            user_id: coordinator_id.clone(),
            title: request.title.clone(),
            event_description: request.event_description.clone(),
            date: request.date.clone(),
            city: request.city.clone(),
            location: request.location.clone(),
            is_event_venue: request.is_event_venue.unwrap_or(false),
            venue_service_id: request.venue_service_id.clone(),
            service_price,
            admin_fee,
            details,
        };
        let event = self.db.insert_event(new_event).await?;
        info!(
            "🔄️ Event {} [{}] created by coordinator {coordinator_id}. Total due: {total_price}",
            event.id, event.title
        );
        self.producers.publish_event_created(EventCreatedEvent::new(event.clone())).await;
        let fan_out = match self.matching.run_vendor_matching(&request, &event.id, &coordinator_id).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                let id = &event.id;
                error!("🔄️ Vendor matching for event {id} did not complete. The event was still created. {e}");
                None
            },
        };
        let payment = PaymentDetails::for_event(&event, total_price, payment_url);
        Ok(EventCreated { event, payment, fan_out })
    }

    pub async fn fetch_event(&self, event_id: &ObjectId) -> Result<Option<Event>, EventFlowError> {
        let event = self.db.fetch_event(event_id).await?;
        Ok(event)
    }

    /// All events for the coordinator. The coordinator must exist.
    pub async fn fetch_events_for_coordinator(&self, coordinator_id: &ObjectId) -> Result<Vec<Event>, EventFlowError> {
        let _ = self.fetch_coordinator(coordinator_id).await?;
        let events = self.db.fetch_events_for_coordinator(coordinator_id).await?;
        Ok(events)
    }

    /// Every event that has been paid for. Unpaid events are not listed publicly.
    pub async fn fetch_paid_events(&self) -> Result<Vec<Event>, EventFlowError> {
        let events = self.db.fetch_paid_events().await?;
        Ok(events)
    }

    /// Up to [`UPCOMING_EVENTS_LIMIT`] paid events dated today or later, soonest first.
    pub async fn fetch_upcoming_events(&self) -> Result<Vec<Event>, EventFlowError> {
        let today = Utc::now().date_naive();
        let events = self.db.fetch_upcoming_paid_events(today, UPCOMING_EVENTS_LIMIT).await?;
        trace!("🔄️ {} upcoming events from {today}", events.len());
        Ok(events)
    }

    pub async fn search_events(&self, search: &EventSearch) -> Result<Vec<Event>, EventFlowError> {
        let events = self.db.search_events(search).await?;
        Ok(events)
    }

    /// Changes the event's descriptive fields and publishes an `EventUpdatedEvent`.
    ///
    /// Prices, payment state and the service sections cannot be changed here. An empty update returns the event as
    /// it is, and publishes nothing.
    pub async fn update_event(&self, event_id: &ObjectId, update: EventUpdate) -> Result<Event, EventFlowError> {
        if update.is_empty() {
            return self.fetch_existing_event(event_id).await;
        }
        let event = self.db.update_event_details(event_id, update).await.map_err(|e| match e {
            StoreError::NotFound(_) => EventFlowError::EventNotFound(event_id.to_string()),
            e => e.into(),
        })?;
        info!("🔄️ Event {} [{}] was updated by its coordinator", event.id, event.title);
        self.producers.publish_event_updated(EventUpdatedEvent::new(event.clone())).await;
        Ok(event)
    }

    pub async fn fetch_bids_for_event(&self, event_id: &ObjectId) -> Result<Vec<ServiceBid>, EventFlowError> {
        let _ = self.fetch_existing_event(event_id).await?;
        let bids = self.db.fetch_bids_for_event(event_id).await?;
        Ok(bids)
    }

    pub async fn event_payment_status(&self, event_id: &ObjectId) -> Result<EventPaymentSummary, EventFlowError> {
        let event = self.fetch_existing_event(event_id).await?;
        Ok(EventPaymentSummary::from(&event))
    }

    /// Generates a new payment redirect for an event that has not been paid yet.
    ///
    /// A `failed` payment status is reset to `pending`. Paid events are rejected with [`EventFlowError::AlreadyPaid`].
    pub async fn retry_event_payment(
        &self,
        event_id: &ObjectId,
        return_url: Option<String>,
        cancel_url: Option<String>,
    ) -> Result<RetryPaymentResult, EventFlowError> {
        let mut event = self.fetch_existing_event(event_id).await?;
        if event.payment_status == PaymentStatus::Paid {
            warn!("🔄️ Payment retry requested for event {event_id}, which is already paid");
            return Err(EventFlowError::AlreadyPaid(event_id.to_string()));
        }
        let coordinator = self.fetch_coordinator(&event.user_id).await?;
        let return_url = return_url.unwrap_or_else(|| self.options.return_url(event_id));
        let cancel_url = cancel_url.unwrap_or_else(|| self.options.cancel_url(event_id));
        let total_price = checked_total(event.service_price, event.admin_fee)?;
        let payment_url =
            self.payment_url(event_id, total_price, &event.title, &coordinator, return_url, cancel_url)?;
        if event.payment_status == PaymentStatus::Failed {
            event = self.db.update_event_payment(event_id, PaymentStatus::Pending, None, None).await?;
            debug!("🔄️ Event {event_id} payment status reset to pending");
        }
        let payment = PaymentDetails::for_event(&event, total_price, payment_url);
        Ok(RetryPaymentResult { event_id: event.id, title: event.title, payment })
    }

    async fn fetch_coordinator(&self, id: &ObjectId) -> Result<User, EventFlowError> {
        self.db.fetch_user(id).await?.ok_or_else(|| {
            debug!("🔄️ Coordinator {id} does not exist");
            EventFlowError::CoordinatorNotFound(id.to_string())
        })
    }

    async fn fetch_existing_event(&self, id: &ObjectId) -> Result<Event, EventFlowError> {
        self.db.fetch_event(id).await?.ok_or_else(|| EventFlowError::EventNotFound(id.to_string()))
    }

    fn payment_url(
        &self,
        event_id: &ObjectId,
        amount: Zar,
        title: &str,
        coordinator: &User,
        return_url: String,
        cancel_url: String,
    ) -> Result<String, EventFlowError> {
        let request = PaymentRequest {
            payment_id: event_id.clone(),
            amount,
            item_name: title.to_string(),
            return_url,
            cancel_url,
            first_name: coordinator.first_name.clone(),
            last_name: coordinator.last_name.clone(),
            email: coordinator.email.clone(),
        };
        let url = self.gateway.payment_url(&request)?;
        Ok(url)
    }
}

fn checked_total(service_price: Zar, admin_fee: Zar) -> Result<Zar, PaymentGatewayError> {
    service_price.checked_add(admin_fee).ok_or_else(|| {
        warn!("🔄️ Service price {service_price} plus admin fee {admin_fee} is too large to charge");
        PaymentGatewayError::InvalidAmount(service_price)
    })
}
