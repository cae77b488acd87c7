use emp_engine::db_types::VendorService;
use serde::{Deserialize, Serialize};

/// The body of a vendor service update: the `service` array of the vendor's onboarding document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorServicesRequest {
    #[serde(default)]
    pub service: Vec<VendorService>,
}
