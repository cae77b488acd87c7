use std::env;

use emp_common::{helpers::parse_boolean_flag, Secret, Zar};
use emp_engine::{emp_api::BidIdempotency, EventFlowOptions};
use log::*;

const DEFAULT_EMP_HOST: &str = "127.0.0.1";
const DEFAULT_EMP_PORT: u16 = 8370;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:4200";
const DEFAULT_EVENT_BUFFER_SIZE: usize = 25;
const DEFAULT_ADMIN_FEE_RANDS: i64 = 500;
const DEFAULT_PAYMENT_PROCESS_URL: &str = "https://sandbox.payfast.co.za/eng/process";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The coordinator web app. Payment return and cancel URLs point back here unless the request supplies its own.
    pub frontend_url: String,
    /// When enabled, re-running the vendor fan-out for an event will not create duplicate bids.
    pub bid_idempotency: BidIdempotency,
    /// Charged when an event creation request does not name an admin fee.
    pub default_admin_fee: Zar,
    /// The capacity of each engine hook channel.
    pub event_buffer_size: usize,
    pub payment: PaymentConfig,
}

#[derive(Clone, Debug, Default)]
pub struct PaymentConfig {
    /// The hosted payment page that coordinators are redirected to.
    pub process_url: String,
    pub merchant_id: String,
    pub merchant_key: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_EMP_HOST.to_string(),
            port: DEFAULT_EMP_PORT,
            database_url: String::default(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            bid_idempotency: BidIdempotency::Disabled,
            default_admin_fee: Zar::from_rands(DEFAULT_ADMIN_FEE_RANDS),
            event_buffer_size: DEFAULT_EVENT_BUFFER_SIZE,
            payment: PaymentConfig {
                process_url: DEFAULT_PAYMENT_PROCESS_URL.to_string(),
                ..Default::default()
            },
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("EMP_HOST").ok().unwrap_or_else(|| DEFAULT_EMP_HOST.into());
        let port = env::var("EMP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for EMP_PORT. {e} Using the default, {DEFAULT_EMP_PORT}, instead."
                    );
                    DEFAULT_EMP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_EMP_PORT);
        let database_url = env::var("EMP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ EMP_DATABASE_URL is not set. Please set it to the URL for the marketplace database.");
            String::default()
        });
        let frontend_url = env::var("EMP_FRONTEND_URL").ok().unwrap_or_else(|| {
            info!("🪛️ EMP_FRONTEND_URL is not set. Payment redirects will point to {DEFAULT_FRONTEND_URL}");
            DEFAULT_FRONTEND_URL.to_string()
        });
        let bid_idempotency = BidIdempotency::from(parse_boolean_flag(env::var("EMP_BID_IDEMPOTENCY").ok(), false));
        if bid_idempotency.is_enabled() {
            info!("🪛️ Bid idempotency is enabled. Repeated fan-outs will not duplicate bids.");
        }
        let default_admin_fee = configure_admin_fee();
        let event_buffer_size = env::var("EMP_EVENT_BUFFER_SIZE")
            .map_err(|_| debug!("🪛️ EMP_EVENT_BUFFER_SIZE is not set. Using {DEFAULT_EVENT_BUFFER_SIZE}."))
            .and_then(|s| {
                s.parse::<usize>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for EMP_EVENT_BUFFER_SIZE. {e}"))
                    .and_then(|n| match n {
                        0 => Err(warn!("🪛️ EMP_EVENT_BUFFER_SIZE cannot be zero")),
                        n => Ok(n),
                    })
            })
            .ok()
            .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE);
        let payment = PaymentConfig::from_env_or_defaults();
        Self {
            host,
            port,
            database_url,
            frontend_url,
            bid_idempotency,
            default_admin_fee,
            event_buffer_size,
            payment,
        }
    }

    pub fn event_flow_options(&self) -> EventFlowOptions {
        EventFlowOptions::default()
            .with_frontend_url(self.frontend_url.clone())
            .with_default_admin_fee(self.default_admin_fee)
    }
}

impl PaymentConfig {
    pub fn from_env_or_defaults() -> Self {
        let process_url = env::var("EMP_PAYMENT_PROCESS_URL").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ EMP_PAYMENT_PROCESS_URL is not set. Coordinators will be sent to the sandbox payment page at \
                 {DEFAULT_PAYMENT_PROCESS_URL}"
            );
            DEFAULT_PAYMENT_PROCESS_URL.to_string()
        });
        let merchant_id = env::var("EMP_PAYMENT_MERCHANT_ID").ok().unwrap_or_else(|| {
            error!("🪛️ EMP_PAYMENT_MERCHANT_ID is not set. Please set it to your payment gateway merchant id.");
            String::default()
        });
        let merchant_key = env::var("EMP_PAYMENT_MERCHANT_KEY").ok().unwrap_or_else(|| {
            error!("🪛️ EMP_PAYMENT_MERCHANT_KEY is not set. Please set it to your payment gateway merchant key.");
            String::default()
        });
        Self { process_url, merchant_id, merchant_key: Secret::new(merchant_key) }
    }
}

fn configure_admin_fee() -> Zar {
    let default_fee = Zar::from_rands(DEFAULT_ADMIN_FEE_RANDS);
    env::var("EMP_DEFAULT_ADMIN_FEE")
        .map_err(|_| debug!("🪛️ EMP_DEFAULT_ADMIN_FEE is not set. Using R{DEFAULT_ADMIN_FEE_RANDS}."))
        .and_then(|s| {
            s.parse::<i64>()
                .map(Zar::from_rands)
                .map_err(|e| warn!("🪛️ Invalid configuration value for EMP_DEFAULT_ADMIN_FEE. {e}"))
        })
        .ok()
        .unwrap_or(default_fee)
}
