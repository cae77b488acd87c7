use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use emp_engine::{
    emp_api::{PaymentGateway, RedirectGateway},
    events::{EventHandlers, EventHooks, EventProducers},
    DirectoryApi,
    EventFlowApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        CoordinatorEventsRoute,
        CreateEventRoute,
        EventBidsRoute,
        EventByIdRoute,
        EventPaymentRoute,
        PaidEventsRoute,
        RegisterUserRoute,
        RetryPaymentRoute,
        SaveVendorServicesRoute,
        SearchEventsRoute,
        UpcomingEventsRoute,
        UpdateEventRoute,
        UserByIdRoute,
        VendorServicesRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let handlers = EventHandlers::new(config.event_buffer_size, create_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// The default subscribers to the engine's events. Vendor notification delivery is not handled by this server, so
/// bid requests are logged for a downstream mailer to pick up.
pub fn create_event_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks.on_event_created(|ev| {
        Box::pin(async move {
            info!("📬️ Event {} \"{}\" created for coordinator {}", ev.event.id, ev.event.title, ev.event.user_id);
        })
    });
    hooks.on_event_updated(|ev| {
        Box::pin(async move {
            let event = &ev.event;
            info!("📬️ Event {} \"{}\" was updated by coordinator {}", event.id, event.title, event.user_id);
        })
    });
    hooks.on_bids_requested(|ev| {
        Box::pin(async move {
            for pair in ev.vendor_bids() {
                info!(
                    "📬️ Vendor {} has been invited to bid ({}) on event {} \"{}\"",
                    pair.vendor_id, pair.bid_id, ev.notice.event_id, ev.notice.title
                );
            }
        })
    });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let gateway: Arc<dyn PaymentGateway> = Arc::new(RedirectGateway::new(
        config.payment.process_url.clone(),
        config.payment.merchant_id.clone(),
        config.payment.merchant_key.clone(),
    ));
    let options = config.event_flow_options();
    let idempotency = config.bid_idempotency;
    let srv = HttpServer::new(move || {
        let events_api = EventFlowApi::new(db.clone(), producers.clone(), gateway.clone(), options.clone())
            .with_idempotency(idempotency);
        let directory_api = DirectoryApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(RegisterUserRoute::<SqliteDatabase>::new())
            .service(UserByIdRoute::<SqliteDatabase>::new())
            .service(SaveVendorServicesRoute::<SqliteDatabase>::new())
            .service(VendorServicesRoute::<SqliteDatabase>::new())
            .service(CreateEventRoute::<SqliteDatabase>::new())
            .service(PaidEventsRoute::<SqliteDatabase>::new())
            .service(UpcomingEventsRoute::<SqliteDatabase>::new())
            .service(SearchEventsRoute::<SqliteDatabase>::new())
            .service(EventByIdRoute::<SqliteDatabase>::new())
            .service(UpdateEventRoute::<SqliteDatabase>::new())
            .service(EventBidsRoute::<SqliteDatabase>::new())
            .service(EventPaymentRoute::<SqliteDatabase>::new())
            .service(RetryPaymentRoute::<SqliteDatabase>::new())
            .service(CoordinatorEventsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("emp::access_log"))
            .app_data(web::Data::new(events_api))
            .app_data(web::Data::new(directory_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
