//! Payment redirects for the coordinator's platform fee.
//!
//! The engine only needs a URL to send the coordinator to. Callbacks from the gateway are handled elsewhere.
use std::fmt::Debug;

use emp_common::{ObjectId, Secret, Zar};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("The payment gateway URL is invalid: {0}")]
    InvalidUrl(String),
    #[error("Cannot request a payment of {0}")]
    InvalidAmount(Zar),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub payment_id: ObjectId,
    pub amount: Zar,
    pub item_name: String,
    pub return_url: String,
    pub cancel_url: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

pub trait PaymentGateway: Send + Sync + Debug {
    /// The URL the payer should be redirected to in order to complete the payment.
    fn payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentGatewayError>;
}

/// A gateway that takes payment details as query parameters on its process URL (PayFast style).
#[derive(Debug, Clone)]
pub struct RedirectGateway {
    process_url: String,
    merchant_id: String,
    merchant_key: Secret<String>,
}

impl RedirectGateway {
    pub fn new<S: Into<String>>(process_url: S, merchant_id: S, merchant_key: Secret<String>) -> Self {
        Self { process_url: process_url.into(), merchant_id: merchant_id.into(), merchant_key }
    }
}

impl PaymentGateway for RedirectGateway {
    fn payment_url(&self, request: &PaymentRequest) -> Result<String, PaymentGatewayError> {
        if request.amount.cents() <= 0 {
            return Err(PaymentGatewayError::InvalidAmount(request.amount));
        }
        let amount = request.amount.to_decimal_string();
        let url = Url::parse_with_params(self.process_url.as_str(), &[
            ("merchant_id", self.merchant_id.as_str()),
            ("merchant_key", self.merchant_key.reveal().as_str()),
            ("amount", amount.as_str()),
            ("item_name", request.item_name.as_str()),
            ("m_payment_id", request.payment_id.as_str()),
            ("return_url", request.return_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
            ("name_first", request.first_name.as_str()),
            ("name_last", request.last_name.as_str()),
            ("email_address", request.email.as_str()),
        ])
        .map_err(|e| PaymentGatewayError::InvalidUrl(format!("{}: {e}", self.process_url)))?;
        Ok(url.to_string())
    }
}
