use std::collections::HashSet;

use cucumber::{gherkin::Step, given, then, when};
use emp_common::ObjectId;
use emp_engine::{
    db_types::{NewUser, ServiceBid, VendorProfile, VendorService, VendorSubCategory},
    matching::EventCreationRequest,
    BidStore,
    EventFlowError,
    UserStore,
    VendorDirectory,
};
use serde_json::Value;

use crate::{cucumber::MarketplaceWorld, support::id};

#[given(expr = "a coordinator with id {word}")]
async fn coordinator(world: &mut MarketplaceWorld, coordinator_id: String) {
    let user = NewUser::new("Thandi", "Mokoena", "thandi@example.com").with_id(id(&coordinator_id));
    world.db().insert_user(user).await.expect("Error inserting coordinator");
}

#[given(expr = "vendor {word} offers sub category {word} of main category {word}")]
async fn offers_sub_category(world: &mut MarketplaceWorld, vendor: String, sub: String, main: String) {
    let service = VendorService::new(id(&main)).with_sub_category(VendorSubCategory::new(id(&sub), true));
    add_service(world, &vendor, service).await;
}

#[given(expr = "vendor {word} lists inactive sub category {word} of main category {word}")]
async fn inactive_sub_category(world: &mut MarketplaceWorld, vendor: String, sub: String, main: String) {
    let service = VendorService::new(id(&main)).with_sub_category(VendorSubCategory::new(id(&sub), false));
    add_service(world, &vendor, service).await;
}

#[given(expr = "vendor {word} offers leaf category {word} of sub category {word} of main category {word}")]
async fn offers_leaf_category(world: &mut MarketplaceWorld, vendor: String, leaf: String, sub: String, main: String) {
    let sub = VendorSubCategory::new(id(&sub), true).with_leaf(id(&leaf), true);
    add_service(world, &vendor, VendorService::new(id(&main)).with_sub_category(sub)).await;
}

#[given(expr = "vendor {word} offers venues in main category {word}")]
async fn offers_venues(world: &mut MarketplaceWorld, vendor: String, main: String) {
    add_service(world, &vendor, VendorService::new(id(&main))).await;
}

async fn add_service(world: &mut MarketplaceWorld, vendor: &str, service: VendorService) {
    let vendor_id = id(vendor);
    let db = world.db();
    let mut profile = match db.fetch_vendor_profile(&vendor_id).await.expect("Error fetching vendor profile") {
        Some(profile) => profile,
        None => {
            let user = NewUser::new("Sipho", "Dlamini", "sipho@example.com").with_id(vendor_id.clone());
            db.insert_user(user).await.expect("Error inserting vendor");
            VendorProfile::new(vendor_id, vec![])
        },
    };
    profile.services.push(service);
    db.save_vendor_profile(profile).await.expect("Error saving vendor profile");
}

#[when(regex = r#"^(\S+) creates an event titled "([^"]*)" with:$"#)]
async fn create_event(world: &mut MarketplaceWorld, coordinator_id: String, title: String, step: &Step) {
    let body = step.docstring.as_deref().unwrap_or("{}");
    let mut json: Value = serde_json::from_str(body).expect("Event body is not valid JSON");
    json["title"] = Value::from(title);
    json["userId"] = Value::from(coordinator_id);
    let request: EventCreationRequest = serde_json::from_value(json).expect("Not a valid event creation request");
    let result = world.api().create_event(request.clone()).await;
    world.last_request = Some(request);
    world.last_result = Some(result);
}

#[when("vendor matching runs again for the event")]
async fn rerun_matching(world: &mut MarketplaceWorld) {
    let request = world.last_request.clone().expect("No event request was made");
    let event = world.created().event.clone();
    world
        .api()
        .matching()
        .run_vendor_matching(&request, &event.id, &event.user_id)
        .await
        .expect("Error running vendor matching");
}

#[then("the event is created")]
async fn event_is_created(world: &mut MarketplaceWorld) {
    let created = world.created();
    assert!(created.fan_out.is_some(), "Vendor matching did not run");
    let event = world.api().fetch_event(&created.event.id).await.expect("Error fetching event");
    assert!(event.is_some(), "Event was not stored");
}

#[then("event creation fails because the coordinator does not exist")]
async fn unknown_coordinator(world: &mut MarketplaceWorld) {
    match world.last_result.as_ref().expect("No event was created") {
        Err(EventFlowError::CoordinatorNotFound(_)) => {},
        other => panic!("Expected CoordinatorNotFound, got {other:?}"),
    }
}

#[then(expr = "the event has {int} bid(s)")]
async fn bid_count(world: &mut MarketplaceWorld, count: usize) {
    let bids = event_bids(world).await;
    assert_eq!(bids.len(), count, "Unexpected bids: {bids:#?}");
}

#[then(expr = "bid {int} is a {word} bid for vendor {word} paid by the {word}")]
async fn bid_details(world: &mut MarketplaceWorld, n: usize, bid_type: String, vendor: String, paid_by: String) {
    let bid = nth_bid(world, n).await;
    assert_eq!(bid.bid_type.to_string(), bid_type);
    assert_eq!(bid.vendor_id, id(&vendor));
    assert_eq!(bid.paid_by.to_string(), paid_by);
    assert_eq!(bid.status.to_string(), "pending");
    assert_eq!(bid.payment_status.to_string(), "pending");
    assert_eq!(bid.event_coordinator_id, world.created().event.user_id);
}

#[then(expr = "bid {int} is for main category {word} and sub category {word}")]
async fn bid_categories(world: &mut MarketplaceWorld, n: usize, main: String, sub: String) {
    let bid = nth_bid(world, n).await;
    assert_eq!(bid.main_category_id, id(&main));
    assert_eq!(bid.sub_category_id, Some(id(&sub)));
}

#[then(expr = "bid {int} is for leaf category {word}")]
async fn bid_leaf(world: &mut MarketplaceWorld, n: usize, leaf: String) {
    let bid = nth_bid(world, n).await;
    assert_eq!(bid.leaf_category_id, Some(id(&leaf)));
}

#[then(expr = "bid {int} is for main category {word} only")]
async fn bid_main_only(world: &mut MarketplaceWorld, n: usize, main: String) {
    let bid = nth_bid(world, n).await;
    assert_eq!(bid.main_category_id, id(&main));
    assert_eq!(bid.sub_category_id, None);
    assert_eq!(bid.leaf_category_id, None);
}

#[then(expr = "{int} vendor(s) was/were notified")]
async fn notified(world: &mut MarketplaceWorld, count: usize) {
    let notices = world.system().notifier.notices();
    let vendors = notices.iter().flat_map(|n| n.vendor_bids.iter().map(|p| &p.vendor_id)).collect::<HashSet<_>>();
    assert_eq!(vendors.len(), count);
    if count > 0 {
        assert!(world.created().fan_out.as_ref().is_some_and(|f| f.notified));
    }
}

#[then("no vendors were notified")]
async fn nobody_notified(world: &mut MarketplaceWorld) {
    assert!(world.system().notifier.notices().is_empty());
    assert!(world.created().fan_out.as_ref().is_some_and(|f| !f.notified));
}

async fn event_bids(world: &MarketplaceWorld) -> Vec<ServiceBid> {
    let event_id: &ObjectId = &world.created().event.id;
    world.db().fetch_bids_for_event(event_id).await.expect("Error fetching bids")
}

async fn nth_bid(world: &MarketplaceWorld, n: usize) -> ServiceBid {
    let mut bids = event_bids(world).await;
    assert!(n >= 1 && n <= bids.len(), "There is no bid #{n}. Found {} bids", bids.len());
    bids.swap_remove(n - 1)
}
