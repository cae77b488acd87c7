use chrono::{DateTime, Utc};
use emp_common::{ObjectId, Zar};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Event, PaymentStatus},
    emp_api::FanOutSummary,
};

const DEFAULT_FRONTEND_URL: &str = "http://localhost:4200";

/// Knobs for [`crate::EventFlowApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFlowOptions {
    /// Used to build the default payment return and cancel URLs.
    pub frontend_url: String,
    /// Charged when the request does not name an admin fee (or names a zero fee).
    pub default_admin_fee: Zar,
}

impl Default for EventFlowOptions {
    fn default() -> Self {
        Self { frontend_url: DEFAULT_FRONTEND_URL.to_string(), default_admin_fee: Zar::from_rands(500) }
    }
}

impl EventFlowOptions {
    pub fn with_frontend_url<S: Into<String>>(mut self, url: S) -> Self {
        self.frontend_url = url.into();
        self
    }

    pub fn with_default_admin_fee(mut self, fee: Zar) -> Self {
        self.default_admin_fee = fee;
        self
    }

    pub fn return_url(&self, event_id: &ObjectId) -> String {
        format!("{}/events/{event_id}/payment-success", self.frontend_url.trim_end_matches('/'))
    }

    pub fn cancel_url(&self, event_id: &ObjectId) -> String {
        format!("{}/events/{event_id}/payment-cancelled", self.frontend_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub service_price: Zar,
    pub admin_fee: Zar,
    pub total_price: Zar,
    pub payment_url: String,
    pub payment_status: PaymentStatus,
}

impl PaymentDetails {
    pub fn for_event(event: &Event, total_price: Zar, payment_url: String) -> Self {
        Self {
            service_price: event.service_price,
            admin_fee: event.admin_fee,
            total_price,
            payment_url,
            payment_status: event.payment_status,
        }
    }
}

/// The result of a successful event creation.
///
/// `fan_out` is `None` when vendor matching failed part way. The event itself is still created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCreated {
    pub event: Event,
    pub payment: PaymentDetails,
    pub fan_out: Option<FanOutSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPaymentSummary {
    pub event_id: ObjectId,
    pub title: String,
    pub payment_status: PaymentStatus,
    pub service_price: Zar,
    pub admin_fee: Zar,
    pub total_price: Zar,
    pub payment_reference: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<&Event> for EventPaymentSummary {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.id.clone(),
            title: event.title.clone(),
            payment_status: event.payment_status,
            service_price: event.service_price,
            admin_fee: event.admin_fee,
            total_price: event.service_price.saturating_add(event.admin_fee),
            payment_reference: event.payment_reference.clone(),
            paid_at: event.paid_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPaymentResult {
    pub event_id: ObjectId,
    pub title: String,
    pub payment: PaymentDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPaymentRequest {
    #[serde(default)]
    pub return_url: Option<String>,
    #[serde(default)]
    pub cancel_url: Option<String>,
}
