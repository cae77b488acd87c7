use actix_web::{http::StatusCode, test::TestRequest, web};
use emp_engine::{db_types::VendorProfile, DirectoryApi};
use serde_json::{json, Value};

use super::{
    helpers::{coordinator, send_request},
    mocks::MockMarketplaceStore,
};
use crate::routes::{RegisterUserRoute, SaveVendorServicesRoute, VendorServicesRoute};

fn configure(db: MockMarketplaceStore) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(DirectoryApi::new(db)))
            .service(RegisterUserRoute::<MockMarketplaceStore>::new())
            .service(SaveVendorServicesRoute::<MockMarketplaceStore>::new())
            .service(VendorServicesRoute::<MockMarketplaceStore>::new());
    }
}

#[actix_web::test]
async fn register_user() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_insert_user()
        .withf(|u| u.id.is_none() && u.email == "thandi@example.com")
        .times(1)
        .returning(|_| Ok(coordinator("65f1c0ffee65f1c0ffee0001")));
    let req = TestRequest::post()
        .uri("/users")
        .set_json(json!({"firstName": "Thandi", "lastName": "Mokoena", "email": "thandi@example.com"}));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::CREATED);
    let user: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(user["id"], "65f1c0ffee65f1c0ffee0001");
    assert_eq!(user["firstName"], "Thandi");
}

#[actix_web::test]
async fn save_services_for_registered_vendor() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().returning(|id| Ok(Some(coordinator(id.as_str()))));
    db.expect_save_vendor_profile()
        .withf(|p| {
            p.user_id.as_str() == "vendor1" &&
                p.services.len() == 1 &&
                p.services[0].sub_categories[0].sub_category_id.as_str() == "B"
        })
        .times(1)
        .returning(Ok);
    let req = TestRequest::put().uri("/vendors/vendor1").set_json(json!({
        "service": [{ "mainCategoryId": "A", "subCategories": [{ "subCategoryId": "B", "isActive": true }] }]
    }));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let profile: VendorProfile = serde_json::from_str(&body).unwrap();
    assert_eq!(profile.user_id.as_str(), "vendor1");
    assert!(profile.services[0].sub_categories[0].is_active);
}

#[actix_web::test]
async fn save_services_for_unknown_vendor() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_user().returning(|_| Ok(None));
    db.expect_save_vendor_profile().never();
    let req = TestRequest::put().uri("/vendors/vendor1").set_json(json!({ "service": [] }));
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Vendor vendor1 is not a registered user"}"#);
}

#[actix_web::test]
async fn invalid_vendor_id() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_vendor_profile().never();
    let req = TestRequest::get().uri("/vendors/not.an.id");
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not.an.id is not a valid id"), "{body}");
}

#[actix_web::test]
async fn missing_vendor_profile() {
    let _ = env_logger::try_init().ok();
    let mut db = MockMarketplaceStore::new();
    db.expect_fetch_vendor_profile().returning(|_| Ok(None));
    let req = TestRequest::get().uri("/vendors/vendor9");
    let (status, body) = send_request(req, configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. Vendor profile for vendor9"}"#);
}
