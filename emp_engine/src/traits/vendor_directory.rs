use emp_common::ObjectId;

use crate::{db_types::VendorProfile, matching::CategoryNeed, traits::StoreError};

/// The directory of onboarded vendors and the categories they serve.
#[allow(async_fn_in_trait)]
pub trait VendorDirectory {
    /// Creates or replaces the profile for `profile.user_id`.
    async fn save_vendor_profile(&self, profile: VendorProfile) -> Result<VendorProfile, StoreError>;

    async fn fetch_vendor_profile(&self, vendor_id: &ObjectId) -> Result<Option<VendorProfile>, StoreError>;

    /// Every vendor that declares at least one service in the given main category, in onboarding order.
    ///
    /// This is only a coarse pre-filter. Use [`VendorDirectory::find_vendors_for_need`] for matching.
    async fn vendors_offering_main_category(&self, main_category_id: &ObjectId)
        -> Result<Vec<VendorProfile>, StoreError>;

    /// Every vendor that can supply the need, as decided by [`VendorProfile::offers`].
    async fn find_vendors_for_need(&self, need: &CategoryNeed) -> Result<Vec<VendorProfile>, StoreError> {
        let candidates = self.vendors_offering_main_category(&need.main_category_id).await?;
        Ok(candidates.into_iter().filter(|v| v.offers(need)).collect())
    }
}
