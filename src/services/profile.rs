//! User profile reads and updates.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::domain::{OwnerScope, PhoneNumber, User, UserPatch};
use crate::store::Store;
use crate::{EcommerceError, Result};

const PROFILE_NOT_FOUND: &str = "User Profile details not found.";

#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>) -> Self { Self { store } }

    /// The caller's own profile, or every profile in shared mode.
    pub async fn profiles(&self, scope: OwnerScope) -> Result<Vec<User>> {
        match scope {
            OwnerScope::User(id) => {
                let user = self.store.get_user(id).await?
                    .ok_or_else(|| EcommerceError::NotFound(PROFILE_NOT_FOUND.into()))?;
                Ok(vec![user])
            }
            OwnerScope::Shared => Ok(self.store.list_users().await?),
        }
    }

    /// Authenticated callers may only update themselves; `profile_id` is
    /// optional for them and must match when given. Shared mode requires it.
    pub async fn update_profile(&self, scope: OwnerScope, profile_id: Option<Uuid>, mut patch: UserPatch) -> Result<User> {
        patch.validate()?;
        if let Some(phone) = patch.phone_number.take() {
            let phone = PhoneNumber::parse(phone).map_err(|e| EcommerceError::Validation(e.to_string()))?;
            patch.phone_number = Some(phone.into_inner());
        }

        let target = match (scope, profile_id) {
            (OwnerScope::User(id), None) => id,
            (OwnerScope::User(id), Some(requested)) if requested == id => id,
            (OwnerScope::User(_), Some(_)) => return Err(EcommerceError::NotFound(PROFILE_NOT_FOUND.into())),
            (OwnerScope::Shared, Some(requested)) => requested,
            (OwnerScope::Shared, None) => return Err(EcommerceError::Validation("profileId is required".into())),
        };

        let user = self.store.update_user(target, patch).await?
            .ok_or_else(|| EcommerceError::NotFound(PROFILE_NOT_FOUND.into()))?;
        tracing::info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}
