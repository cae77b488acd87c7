//! Request handlers for the marketplace REST API.
//!
//! The engine APIs are generic over their database backend, so each handler is generic too, and is registered through
//! a `...Route` struct generated by the `route!` macro. Handlers only parse the request, call the engine and shape the
//! response. Anything longer belongs in the engine.
use actix_web::{get, web, HttpResponse, Responder};
use emp_common::ObjectId;
use emp_engine::{
    db_types::{EventSearch, EventUpdate, NewUser, VendorProfile},
    emp_api::RetryPaymentRequest,
    matching::EventCreationRequest,
    traits::{BidStore, EventStore, UserStore, VendorDirectory},
    DirectoryApi,
    EventFlowApi,
};
use log::*;

use crate::{data_objects::VendorServicesRequest, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

fn parse_path_id(id: &str) -> Result<ObjectId, ServerError> {
    id.parse().map_err(|e| {
        debug!("💻️ Invalid id in request path: {id}. {e}");
        ServerError::InvalidRequestPath(format!("{id} is not a valid id. {e}"))
    })
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Users  ----------------------------------------------------
route!(register_user => Post "/users" impl UserStore, VendorDirectory);
pub async fn register_user<B>(
    body: web::Json<NewUser>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + VendorDirectory,
{
    trace!("💻️ Received user registration request");
    let user = api.register_user(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

route!(user_by_id => Get "/users/{user_id}" impl UserStore, VendorDirectory);
pub async fn user_by_id<B>(
    path: web::Path<String>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + VendorDirectory,
{
    let user_id = parse_path_id(&path.into_inner())?;
    trace!("💻️ Fetching user {user_id}");
    let user = api.fetch_user(&user_id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("User {user_id}")))?;
    Ok(HttpResponse::Ok().json(user))
}

//----------------------------------------------   Vendors  ----------------------------------------------------
route!(save_vendor_services => Put "/vendors/{vendor_id}" impl UserStore, VendorDirectory);
/// Replaces the services a vendor offers. The vendor must already be registered as a user.
///
/// The body is the vendor's onboarding document: `{ "service": [ { "mainCategoryId": ..., "subCategories": [...] } ] }`
pub async fn save_vendor_services<B>(
    path: web::Path<String>,
    body: web::Json<VendorServicesRequest>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + VendorDirectory,
{
    let vendor_id = parse_path_id(&path.into_inner())?;
    debug!("💻️ Received service update for vendor {vendor_id}");
    let profile = VendorProfile::new(vendor_id, body.into_inner().service);
    let profile = api.save_vendor_profile(profile).await?;
    Ok(HttpResponse::Ok().json(profile))
}

route!(vendor_services => Get "/vendors/{vendor_id}" impl UserStore, VendorDirectory);
pub async fn vendor_services<B>(
    path: web::Path<String>,
    api: web::Data<DirectoryApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + VendorDirectory,
{
    let vendor_id = parse_path_id(&path.into_inner())?;
    let profile = api
        .fetch_vendor_profile(&vendor_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Vendor profile for {vendor_id}")))?;
    Ok(HttpResponse::Ok().json(profile))
}

//----------------------------------------------   Events  ----------------------------------------------------
route!(create_event => Post "/events" impl UserStore, EventStore, VendorDirectory, BidStore);
/// Creates an event for the coordinator named in `userId`, and asks matching vendors to bid on its service needs.
///
/// The response carries the stored event, the payment redirect for the platform fee, and a summary of the vendor
/// fan-out. `fanOut` is `null` if vendor matching could not complete; the event is still created in that case.
pub async fn create_event<B>(
    body: web::Json<EventCreationRequest>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let request = body.into_inner();
    debug!("💻️ Received event creation request \"{}\" from {}", request.title, request.user_id);
    let created = api.create_event(request).await?;
    Ok(HttpResponse::Created().json(created))
}

route!(paid_events => Get "/events" impl UserStore, EventStore, VendorDirectory, BidStore);
/// Lists every paid event. Events still awaiting payment are not public.
pub async fn paid_events<B>(api: web::Data<EventFlowApi<B>>) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let events = api.fetch_paid_events().await?;
    Ok(HttpResponse::Ok().json(events))
}

route!(upcoming_events => Get "/events/upcoming" impl UserStore, EventStore, VendorDirectory, BidStore);
pub async fn upcoming_events<B>(api: web::Data<EventFlowApi<B>>) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let events = api.fetch_upcoming_events().await?;
    Ok(HttpResponse::Ok().json(events))
}

route!(search_events => Post "/events/search" impl UserStore, EventStore, VendorDirectory, BidStore);
/// The body is `{ "searchCriteria": "...", "city": "..." }`. Both fields are optional.
pub async fn search_events<B>(
    body: web::Json<EventSearch>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let search = body.into_inner();
    trace!("💻️ Searching events for {search:?}");
    let events = api.search_events(&search).await?;
    Ok(HttpResponse::Ok().json(events))
}

route!(update_event => Put "/events/{event_id}" impl UserStore, EventStore, VendorDirectory, BidStore);
pub async fn update_event<B>(
    path: web::Path<String>,
    body: web::Json<EventUpdate>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let event_id = parse_path_id(&path.into_inner())?;
    debug!("💻️ Received update for event {event_id}");
    let event = api.update_event(&event_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(event))
}

route!(event_by_id => Get "/events/{event_id}" impl UserStore, EventStore, VendorDirectory, BidStore);
pub async fn event_by_id<B>(
    path: web::Path<String>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let event_id = parse_path_id(&path.into_inner())?;
    trace!("💻️ Fetching event {event_id}");
    let event =
        api.fetch_event(&event_id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Event {event_id}")))?;
    Ok(HttpResponse::Ok().json(event))
}

route!(event_bids => Get "/events/{event_id}/bids" impl UserStore, EventStore, VendorDirectory, BidStore);
pub async fn event_bids<B>(
    path: web::Path<String>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let event_id = parse_path_id(&path.into_inner())?;
    let bids = api.fetch_bids_for_event(&event_id).await?;
    Ok(HttpResponse::Ok().json(bids))
}

route!(event_payment => Get "/events/{event_id}/payment" impl UserStore, EventStore, VendorDirectory, BidStore);
pub async fn event_payment<B>(
    path: web::Path<String>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let event_id = parse_path_id(&path.into_inner())?;
    let summary = api.event_payment_status(&event_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}

route!(retry_payment => Post "/events/{event_id}/payment/retry" impl UserStore, EventStore, VendorDirectory, BidStore);
/// Issues a fresh payment redirect for an unpaid event. The body is optional, and may override the return and cancel
/// URLs.
pub async fn retry_payment<B>(
    path: web::Path<String>,
    body: Option<web::Json<RetryPaymentRequest>>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let event_id = parse_path_id(&path.into_inner())?;
    let RetryPaymentRequest { return_url, cancel_url } = body.map(|b| b.into_inner()).unwrap_or_default();
    info!("💻️ Payment retry requested for event {event_id}");
    let result = api.retry_event_payment(&event_id, return_url, cancel_url).await?;
    Ok(HttpResponse::Ok().json(result))
}

//----------------------------------------------   Coordinators  ----------------------------------------------------
route!(
    coordinator_events => Get "/coordinators/{coordinator_id}/events" impl UserStore, EventStore, VendorDirectory, BidStore
);
pub async fn coordinator_events<B>(
    path: web::Path<String>,
    api: web::Data<EventFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: UserStore + EventStore + VendorDirectory + BidStore,
{
    let coordinator_id = parse_path_id(&path.into_inner())?;
    let events = api.fetch_events_for_coordinator(&coordinator_id).await?;
    Ok(HttpResponse::Ok().json(events))
}
