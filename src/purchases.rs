//! Seam to the external purchasing SDK

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::error::{Result, StorefrontError};
use crate::types::CustomerInfo;

/// Source of customer records.
///
/// Implementations own caching and retry; callers make exactly one call per
/// lookup and propagate whatever latency or cancellation the call has.
#[async_trait]
pub trait PurchasesProvider: Send + Sync {
    /// Current customer record.
    async fn customer_info(&self) -> Result<CustomerInfo>;

    /// Sync receipts with the backend and return the refreshed record.
    async fn restore_purchases(&self) -> Result<CustomerInfo> {
        self.customer_info().await
    }
}

/// In-memory provider returning a fixed record, or `NoCustomerInfo` when empty.
#[derive(Debug, Default)]
pub struct StaticPurchases {
    info: RwLock<Option<CustomerInfo>>,
}

impl StaticPurchases {
    pub fn new(info: Option<CustomerInfo>) -> Self {
        Self {
            info: RwLock::new(info),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, info: CustomerInfo) {
        *self.info.write().unwrap_or_else(PoisonError::into_inner) = Some(info);
    }

    pub fn clear(&self) {
        *self.info.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl PurchasesProvider for StaticPurchases {
    async fn customer_info(&self) -> Result<CustomerInfo> {
        self.info
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(StorefrontError::no_customer_info)
    }
}
