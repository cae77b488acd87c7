use emp_common::ObjectId;

use crate::{
    db_types::{NewUser, User},
    traits::StoreError,
};

/// Coordinators (and vendors) are plain user records as far as the engine is concerned.
#[allow(async_fn_in_trait)]
pub trait UserStore {
    /// Stores a new user. If `user.id` is `None`, a fresh id is generated.
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn fetch_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
}
