use std::sync::Arc;

use crate::{
    clock::Clock,
    domain::BindCode,
    errors::StoreResult,
    ports::BindCodeRepository,
};

/// Reads and deletes single-use bind codes, enforcing expiry.
#[derive(Clone)]
pub struct CodeStore {
    repo: Arc<dyn BindCodeRepository>,
    clock: Arc<dyn Clock>,
}

impl CodeStore {
    pub fn new(repo: Arc<dyn BindCodeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Returns the code only if it exists and `expires_at` is still in the future.
    ///
    /// Missing, expired and unreadable codes all come back as `None`.
    pub async fn lookup_valid_code(&self, code: &str) -> Option<BindCode> {
        let now = self.clock.now();
        let found = match self.repo.find_valid_bind_code(code, now).await {
            Ok(found) => found?,
            Err(e) => {
                tracing::warn!(error = %e, "bind code lookup failed");
                return None;
            }
        };

        if found.code != code {
            return None;
        }

        if !found.is_valid_at(now) {
            tracing::debug!(expires_at = %found.expires_at, %now, "bind code expired");
            return None;
        }

        Some(found)
    }

    /// Idempotent: an absent code is not an error.
    pub async fn delete_code(&self, code: &str) -> StoreResult<()> {
        self.repo.delete_bind_code(code).await
    }
}
