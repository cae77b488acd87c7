use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::{
    emp_api::{NewEventNotice, NotificationError, VendorNotifier},
    events::{BidsRequestedEvent, EventCreatedEvent, EventHandler, EventProducer, EventUpdatedEvent, Handler},
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub event_created_producer: Vec<EventProducer<EventCreatedEvent>>,
    pub event_updated_producer: Vec<EventProducer<EventUpdatedEvent>>,
    pub bids_requested_producer: Vec<EventProducer<BidsRequestedEvent>>,
}

impl EventProducers {
    pub async fn publish_event_created(&self, event: EventCreatedEvent) {
        for producer in &self.event_created_producer {
            // Failures are logged by the producer. Nobody downstream depends on this event.
            let _ = producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_event_updated(&self, event: EventUpdatedEvent) {
        for producer in &self.event_updated_producer {
            let _ = producer.publish_event(event.clone()).await;
        }
    }
}

impl VendorNotifier for EventProducers {
    async fn notify_vendors_for_new_event(&self, notice: NewEventNotice) -> Result<(), NotificationError> {
        if self.bids_requested_producer.is_empty() {
            debug!(
                "📬️ No bid request subscribers are registered. {} vendors will not hear about event {}",
                notice.vendor_bids.len(),
                notice.event_id
            );
            return Ok(());
        }
        for producer in &self.bids_requested_producer {
            producer
                .publish_event(BidsRequestedEvent::new(notice.clone()))
                .await
                .map_err(|e| NotificationError(e.to_string()))?;
        }
        Ok(())
    }
}

pub struct EventHandlers {
    pub on_event_created: Option<EventHandler<EventCreatedEvent>>,
    pub on_event_updated: Option<EventHandler<EventUpdatedEvent>>,
    pub on_bids_requested: Option<EventHandler<BidsRequestedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_event_created = hooks.on_event_created.map(|f| EventHandler::new(buffer_size, f));
        let on_event_updated = hooks.on_event_updated.map(|f| EventHandler::new(buffer_size, f));
        let on_bids_requested = hooks.on_bids_requested.map(|f| EventHandler::new(buffer_size, f));
        Self { on_event_created, on_event_updated, on_bids_requested }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_event_created {
            result.event_created_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_event_updated {
            result.event_updated_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_bids_requested {
            result.bids_requested_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_event_created {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_event_updated {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_bids_requested {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_event_created: Option<Handler<EventCreatedEvent>>,
    pub on_event_updated: Option<Handler<EventUpdatedEvent>>,
    pub on_bids_requested: Option<Handler<BidsRequestedEvent>>,
}

impl EventHooks {
    pub fn on_event_created<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(EventCreatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_event_created = Some(Arc::new(f));
        self
    }

    pub fn on_event_updated<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(EventUpdatedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_event_updated = Some(Arc::new(f));
        self
    }

    pub fn on_bids_requested<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BidsRequestedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_bids_requested = Some(Arc::new(f));
        self
    }
}
