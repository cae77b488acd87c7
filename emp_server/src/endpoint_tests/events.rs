use actix_web::{http::StatusCode, test::TestRequest, web};
use emp_engine::{EventFlowApi, StoreError};
use serde_json::{json, Value};

use super::{
    helpers::{coordinator, event, events_api, send_request, stored_event},
    mocks::MockMarketplaceStore,
};
use crate::routes::{
    CoordinatorEventsRoute,
    CreateEventRoute,
    EventBidsRoute,
    EventByIdRoute,
    EventPaymentRoute,
    PaidEventsRoute,
    RetryPaymentRoute,
    SearchEventsRoute,
    UpcomingEventsRoute,
    UpdateEventRoute,
};

fn configure(api: EventFlowApi<MockMarketplaceStore>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(api))
            .service(CreateEventRoute::<MockMarketplaceStore>::new())
            .service(PaidEventsRoute::<MockMarketplaceStore>::new())
            .service(UpcomingEventsRoute::<MockMarketplaceStore>::new())
            .service(SearchEventsRoute::<MockMarketplaceStore>::new())
            .service(EventByIdRoute::<MockMarketplaceStore>::new())
            .service(UpdateEventRoute::<MockMarketplaceStore>::new())
            .service(EventBidsRoute::<MockMarketplaceStore>::new())
            .service(EventPaymentRoute::<MockMarketplaceStore>::new())
            .service(RetryPaymentRoute::<MockMarketplaceStore>::new())
            .service(CoordinatorEventsRoute::<MockMarketplaceStore>::new());
    }
}

#[actix_web::test]
async fn fetch_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event()
        .withf(|id| id.as_str() == "e1")
        .returning(|_| Ok(Some(event("e1", "coord1", "pending"))));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events/e1"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let event: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(event["title"], "Jazz on the Lawn");
    assert_eq!(event["paymentStatus"], "pending");
    assert_eq!(event["servicePrice"], 1000.0);
}

#[actix_web::test]
async fn fetch_missing_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().returning(|_| Ok(None));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events/e404"), configure(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Event e404"}"#);
}

#[actix_web::test]
async fn bids_for_missing_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().returning(|_| Ok(None));
    db.expect_fetch_bids_for_event().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events/e404/bids"), configure(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Event e404 does not exist"}"#);
}

#[actix_web::test]
async fn payment_status() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().returning(|_| Ok(Some(event("e1", "coord1", "failed"))));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events/e1/payment"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let summary: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(summary["paymentStatus"], "failed");
}

#[actix_web::test]
async fn retry_paid_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().returning(|_| Ok(Some(event("e1", "coord1", "paid"))));
    db.expect_update_event_payment().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::post().uri("/events/e1/payment/retry"), configure(api)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("Event e1 has already been paid for"), "{body}");
}

#[actix_web::test]
async fn retry_pending_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().returning(|_| Ok(Some(event("e1", "coord1", "pending"))));
    db.expect_fetch_user().returning(|id| Ok(Some(coordinator(id.as_str()))));
    db.expect_update_event_payment().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::post()
        .uri("/events/e1/payment/retry")
        .set_json(json!({ "returnUrl": "https://example.com/thanks" }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let result: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["eventId"], "e1");
    let url = result["payment"]["paymentUrl"].as_str().unwrap();
    assert!(url.starts_with("https://sandbox.payfast.co.za/eng/process?"), "{url}");
    assert!(url.contains("amount=1500.00"), "{url}");
    assert!(url.contains("return_url=https%3A%2F%2Fexample.com%2Fthanks"), "{url}");
}

#[actix_web::test]
async fn create_event_for_unknown_coordinator() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().returning(|_| Ok(None));
    db.expect_insert_event().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::post().uri("/events").set_json(json!({ "title": "Jazz", "userId": "coord9" }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Coordinator coord9 does not exist"}"#);
}

#[actix_web::test]
async fn create_event_with_invalid_coordinator_id() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::post().uri("/events").set_json(json!({ "title": "Jazz", "userId": "" }));
    let (status, _) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_event_without_matching_vendors() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().returning(|id| Ok(Some(coordinator(id.as_str()))));
    db.expect_insert_event().times(1).returning(|e| Ok(stored_event(e)));
    let mut matcher = MockMarketplaceStore::new();
    matcher
        .expect_vendors_offering_main_category()
        .withf(|main| main.as_str() == "A")
        .times(1)
        .returning(|_| Ok(vec![]));
    matcher.expect_insert_bid().never();
    let api = events_api(db, matcher);
    let req = TestRequest::post().uri("/events").set_json(json!({
        "title": "Jazz on the Lawn",
        "userId": "coord1",
        "servicePrice": 1000,
        "infrastructure": { "fencing": { "mainCategoryId": "A", "subCategoryId": "B", "vendor": false } }
    }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["event"]["title"], "Jazz on the Lawn");
    assert_eq!(created["event"]["details"]["infrastructure"]["fencing"]["mainCategoryId"], "A");
    assert_eq!(created["payment"]["totalPrice"], 1500.0);
    assert_eq!(created["fanOut"]["needs"], 1);
    assert_eq!(created["fanOut"]["bids"], json!([]));
    assert_eq!(created["fanOut"]["notified"], false);
}

#[actix_web::test]
async fn events_for_coordinator() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().returning(|id| Ok(Some(coordinator(id.as_str()))));
    db.expect_fetch_events_for_coordinator()
        .returning(|c| Ok(vec![event("e1", c.as_str(), "paid"), event("e2", c.as_str(), "pending")]));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/coordinators/coord1/events"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<Value> = serde_json::from_str(&body).unwrap();
    let ids = events.iter().map(|e| e["id"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["e1", "e2"]);
}

#[actix_web::test]
async fn create_event_with_an_absurd_price() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().never();
    db.expect_insert_event().never();
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::post()
        .uri("/events")
        .set_json(json!({ "title": "Jazz", "userId": "coord1", "servicePrice": 92233720368547758u64 }));
    let (status, _) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn paid_events() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_paid_events().times(1).returning(|| Ok(vec![event("e1", "coord1", "paid")]));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["paymentStatus"], "paid");
}

#[actix_web::test]
async fn upcoming_events() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_event().never();
    db.expect_fetch_upcoming_paid_events()
        .withf(|_, limit| *limit == 10)
        .times(1)
        .returning(|_, _| Ok(vec![event("e2", "coord1", "paid")]));
    let api = events_api(db, MockMarketplaceStore::new());
    let (status, body) = send_request(TestRequest::get().uri("/events/upcoming"), configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(events[0]["id"], "e2");
}

#[actix_web::test]
async fn search_events() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_search_events()
        .withf(|s| s.text() == Some("jazz") && s.city() == Some("Cape Town"))
        .times(1)
        .returning(|_| Ok(vec![event("e1", "coord1", "paid")]));
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::post()
        .uri("/events/search")
        .set_json(json!({ "searchCriteria": "jazz", "city": "Cape Town", "latitude": "-33.92", "longitude": "18.42" }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let events: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(events[0]["title"], "Jazz on the Lawn");
}

#[actix_web::test]
async fn update_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_update_event_details()
        .withf(|id, update| {
            id.as_str() == "e1" && update.title.as_deref() == Some("Jazz at Dusk") && update.city.is_none()
        })
        .times(1)
        .returning(|id, update| {
            let mut event = event(id.as_str(), "coord1", "pending");
            event.title = update.title.unwrap_or_default();
            Ok(event)
        });
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::put().uri("/events/e1").set_json(json!({ "title": "Jazz at Dusk" }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::OK);
    let event: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(event["title"], "Jazz at Dusk");
    assert_eq!(event["city"], "Cape Town");
}

#[actix_web::test]
async fn update_missing_event() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_update_event_details().returning(|id, _| Err(StoreError::NotFound(format!("event {id}"))));
    let api = events_api(db, MockMarketplaceStore::new());
    let req = TestRequest::put().uri("/events/e404").set_json(json!({ "title": "Ghost" }));
    let (status, body) = send_request(req, configure(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Event e404 does not exist"}"#);
}
