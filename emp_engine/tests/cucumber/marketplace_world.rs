use cucumber::World;
use emp_engine::{
    emp_api::{BidIdempotency, EventCreated},
    matching::EventCreationRequest,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    EventFlowApi,
    EventFlowError,
    EventFlowOptions,
    MarketplaceDatabase,
    SqliteDatabase,
};
use log::*;

use crate::support::{test_gateway, RecordingNotifier};

#[derive(Default, Debug, World)]
pub struct MarketplaceWorld {
    pub system: Option<MarketplaceSystem>,
    pub last_request: Option<EventCreationRequest>,
    pub last_result: Option<Result<EventCreated, EventFlowError>>,
}

#[derive(Debug)]
pub struct MarketplaceSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub notifier: RecordingNotifier,
    pub api: EventFlowApi<SqliteDatabase, RecordingNotifier>,
}

impl MarketplaceWorld {
    pub fn system(&self) -> &MarketplaceSystem {
        self.system.as_ref().expect("Marketplace not initialised")
    }

    pub fn api(&self) -> &EventFlowApi<SqliteDatabase, RecordingNotifier> {
        &self.system().api
    }

    pub fn db(&self) -> &SqliteDatabase {
        &self.system().db
    }

    pub fn created(&self) -> &EventCreated {
        match self.last_result.as_ref().expect("No event was created") {
            Ok(created) => created,
            Err(e) => panic!("Event creation failed: {e}"),
        }
    }

    pub fn enable_idempotency(&mut self) {
        let system = self.system.as_mut().expect("Marketplace not initialised");
        let api = MarketplaceSystem::build_api(&system.db, system.notifier.clone());
        system.api = api.with_idempotency(BidIdempotency::Enabled);
    }
}

impl MarketplaceSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        prepare_test_env(&url).await;
        let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error creating connection to database");
        debug!("Created database: {}", db.url());
        let notifier = RecordingNotifier::default();
        let api = Self::build_api(&db, notifier.clone());
        Self { db_path: url, db, notifier, api }
    }

    fn build_api(db: &SqliteDatabase, notifier: RecordingNotifier) -> EventFlowApi<SqliteDatabase, RecordingNotifier> {
        let producers = Default::default();
        EventFlowApi::with_notifier(db.clone(), notifier, producers, test_gateway(), EventFlowOptions::default())
    }
}
