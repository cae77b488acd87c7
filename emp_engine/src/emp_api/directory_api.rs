use std::fmt::Debug;

use emp_common::ObjectId;
use log::*;

use crate::{
    db_types::{NewUser, User, VendorProfile},
    emp_api::DirectoryApiError,
    traits::{UserStore, VendorDirectory},
};

/// `DirectoryApi` manages the people in the marketplace: coordinators and vendors, and the services vendors offer.
pub struct DirectoryApi<B> {
    db: B,
}

impl<B> Debug for DirectoryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DirectoryApi")
    }
}

impl<B> DirectoryApi<B>
where B: UserStore + VendorDirectory
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn register_user(&self, user: NewUser) -> Result<User, DirectoryApiError> {
        let user = self.db.insert_user(user).await?;
        info!("💻️ User {} registered", user.id);
        Ok(user)
    }

    pub async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, DirectoryApiError> {
        let user = self.db.fetch_user(id).await?;
        Ok(user)
    }

    /// Creates or replaces a vendor's declared services. The vendor must already be a registered user.
    pub async fn save_vendor_profile(&self, profile: VendorProfile) -> Result<VendorProfile, DirectoryApiError> {
        if self.db.fetch_user(&profile.user_id).await?.is_none() {
            return Err(DirectoryApiError::VendorNotFound(profile.user_id.to_string()));
        }
        let profile = self.db.save_vendor_profile(profile).await?;
        info!("💻️ Vendor {} now offers {} services", profile.user_id, profile.services.len());
        Ok(profile)
    }

    pub async fn fetch_vendor_profile(&self, vendor_id: &ObjectId) -> Result<Option<VendorProfile>, DirectoryApiError> {
        let profile = self.db.fetch_vendor_profile(vendor_id).await?;
        Ok(profile)
    }
}
