use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{BindCode, ExternalIdentity, LinkedUser, UserId},
    errors::StoreResult,
};

/// Hexagonal port for the bind-code table.
///
/// Codes are issued elsewhere; this side only reads and deletes them.
#[async_trait]
pub trait BindCodeRepository: Send + Sync {
    /// Exact match on the (already canonical) code among rows with
    /// `expires_at > now`. Expired rows sharing the string are skipped.
    async fn find_valid_bind_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<BindCode>>;

    /// Must succeed when the code is already gone.
    async fn delete_bind_code(&self, code: &str) -> StoreResult<()>;
}

/// Hexagonal port for the user-record table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Set the user's linked identity. `StoreError::NotFound` when no row matched.
    async fn update_user_external_id(
        &self,
        user_id: &UserId,
        identity: &ExternalIdentity,
    ) -> StoreResult<()>;

    async fn find_user_name(&self, user_id: &UserId) -> StoreResult<Option<String>>;

    async fn find_user_by_external_id(
        &self,
        identity: &ExternalIdentity,
    ) -> StoreResult<Option<LinkedUser>>;
}
