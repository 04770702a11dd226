//! Optimization quota per user.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Entitlement {
    pub allowed: bool,
    pub remaining: u32,
}

impl Entitlement {
    /// What the caller is treated as having when the quota cannot be read.
    pub const UNKNOWN: Entitlement = Entitlement {
        allowed: false,
        remaining: 0,
    };
}

#[async_trait]
pub trait EntitlementService: Send + Sync {
    async fn can_optimize(&self, user_id: &str) -> Result<Entitlement, ServiceError>;

    /// Records one completed optimization against the user's quota.
    async fn use_optimization(&self, user_id: &str) -> Result<(), ServiceError>;
}

/// Process-local ledger: every user starts with `free_quota` optimizations.
pub struct InMemoryEntitlements {
    free_quota: u32,
    used: RwLock<HashMap<String, u32>>,
}

impl InMemoryEntitlements {
    pub fn new(free_quota: u32) -> Self {
        Self {
            free_quota,
            used: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl EntitlementService for InMemoryEntitlements {
    async fn can_optimize(&self, user_id: &str) -> Result<Entitlement, ServiceError> {
        let used = self.used.read().await.get(user_id).copied().unwrap_or(0);
        let remaining = self.free_quota.saturating_sub(used);
        Ok(Entitlement {
            allowed: remaining > 0,
            remaining,
        })
    }

    async fn use_optimization(&self, user_id: &str) -> Result<(), ServiceError> {
        let mut ledger = self.used.write().await;
        let used = ledger.entry(user_id.to_string()).or_insert(0);
        *used += 1;
        info!(user_id, used = *used, quota = self.free_quota, "optimization recorded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_quota_counts_down_per_user() {
        let service = InMemoryEntitlements::new(2);
        assert_eq!(
            service.can_optimize("a").await.unwrap(),
            Entitlement {
                allowed: true,
                remaining: 2
            }
        );

        service.use_optimization("a").await.unwrap();
        service.use_optimization("a").await.unwrap();

        assert_eq!(
            service.can_optimize("a").await.unwrap(),
            Entitlement {
                allowed: false,
                remaining: 0
            }
        );
        assert_eq!(service.can_optimize("b").await.unwrap().remaining, 2);
    }

    #[tokio::test]
    async fn test_zero_quota_never_allows() {
        let service = InMemoryEntitlements::new(0);
        assert!(!service.can_optimize("a").await.unwrap().allowed);
    }
}
