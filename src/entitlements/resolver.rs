//! Decides whether a customer should get an entitlement

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::registry::{BackwardsCompatibilityEntitlement, EntitlementRegistry};
use crate::environment::{Environment, EnvironmentProbe, SandboxOverrides};
use crate::error::Result;
use crate::purchases::PurchasesProvider;
use crate::types::CustomerInfo;

/// Configuration options for the resolver
#[derive(Clone, Default)]
pub struct ResolverOptions {
    /// Sandbox detection (default: production)
    pub environment: Option<Arc<dyn EnvironmentProbe>>,
    /// Substitutes for the sandbox's placeholder version/date (default: none)
    pub overrides: Option<SandboxOverrides>,
    /// Rules to register up front, first registration per name wins
    pub entitlements: Vec<BackwardsCompatibilityEntitlement>,
}

impl std::fmt::Debug for ResolverOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverOptions")
            .field("environment", &self.environment.as_ref().map(|_| "<probe>"))
            .field("overrides", &self.overrides)
            .field("entitlements", &self.entitlements)
            .finish()
    }
}

/// Combines live grants from the purchasing SDK with registered
/// backwards-compatibility rules.
///
/// A live grant always wins. The registry is only consulted when the SDK
/// reports the entitlement inactive, and missing data never grants access.
///
/// # Example
/// ```rust,ignore
/// let resolver = EntitlementResolver::new(purchases, ResolverOptions::default());
/// resolver.register(BackwardsCompatibilityEntitlement::new("premium", ["50", "51"]));
///
/// let (entitled, _info) = resolver.resolve_with_fallback_fetch("premium").await;
/// ```
pub struct EntitlementResolver {
    registry: EntitlementRegistry,
    environment: Arc<dyn EnvironmentProbe>,
    overrides: SandboxOverrides,
    purchases: Arc<dyn PurchasesProvider>,
}

impl EntitlementResolver {
    pub fn new(purchases: Arc<dyn PurchasesProvider>, options: ResolverOptions) -> Self {
        Self {
            registry: EntitlementRegistry::from_entries(options.entitlements),
            environment: options
                .environment
                .unwrap_or_else(|| Arc::new(Environment::Production)),
            overrides: options.overrides.unwrap_or_default(),
            purchases,
        }
    }

    // ==================== Registry ====================

    /// Register a rule. No-op if the name is already registered.
    pub fn register(&self, entry: BackwardsCompatibilityEntitlement) {
        let name = entry.entitlement_name.clone();
        if self.registry.register(entry) {
            tracing::debug!(entitlement = %name, "Registered backwards compatibility entitlement");
        } else {
            tracing::debug!(
                entitlement = %name,
                "Backwards compatibility entitlement already registered, keeping existing entry"
            );
        }
    }

    /// Remove all rules for this entitlement name.
    pub fn unregister(&self, entitlement_name: &str) {
        let removed = self.registry.unregister(entitlement_name);
        tracing::debug!(entitlement = %entitlement_name, removed, "Unregistered backwards compatibility entitlement");
    }

    /// Registered rules in insertion order.
    pub fn registered(&self) -> Vec<BackwardsCompatibilityEntitlement> {
        self.registry.entries()
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment.is_sandbox()
    }

    // ==================== Resolution ====================

    /// Whether `entitlement` should be active, consulting registered rules.
    pub fn resolve(&self, info: &CustomerInfo, entitlement: &str) -> bool {
        self.resolve_with(info, entitlement, true)
    }

    /// Whether `entitlement` should be active.
    ///
    /// With `check_registered_compatibility` off only the live grant counts.
    pub fn resolve_with(
        &self,
        info: &CustomerInfo,
        entitlement: &str,
        check_registered_compatibility: bool,
    ) -> bool {
        if info.is_entitlement_active(entitlement) {
            tracing::debug!(entitlement = %entitlement, "Entitlement active via purchasing SDK");
            return true;
        }

        if !check_registered_compatibility {
            return false;
        }

        self.check_compatibility(
            entitlement,
            self.effective_version(info),
            self.effective_purchase_date(info),
        )
    }

    /// Fetch the customer once and resolve against it.
    ///
    /// When the fetch fails, a sandbox build with a version override is still
    /// evaluated against the registry; everything else resolves to `false`.
    pub async fn resolve_with_fallback_fetch(&self, entitlement: &str) -> (bool, Option<CustomerInfo>) {
        let fetched = self.purchases.customer_info().await;
        self.resolve_fetched(entitlement, fetched)
    }

    /// Like [`resolve_with_fallback_fetch`](Self::resolve_with_fallback_fetch),
    /// but restores purchases first.
    pub async fn restore_and_resolve(&self, entitlement: &str) -> (bool, Option<CustomerInfo>) {
        let fetched = self.purchases.restore_purchases().await;
        self.resolve_fetched(entitlement, fetched)
    }

    // ==================== Internal Helpers ====================

    fn resolve_fetched(
        &self,
        entitlement: &str,
        fetched: Result<CustomerInfo>,
    ) -> (bool, Option<CustomerInfo>) {
        match fetched {
            Ok(info) => (self.resolve(&info, entitlement), Some(info)),
            Err(e) => {
                tracing::warn!(entitlement = %entitlement, error = %e, "Failed to fetch customer info");

                let entitled = match self.sandbox_version_override() {
                    Some(version) => self.check_compatibility(
                        entitlement,
                        Some(version),
                        self.overrides.purchase_date,
                    ),
                    None => false,
                };
                (entitled, None)
            }
        }
    }

    fn sandbox_version_override(&self) -> Option<&str> {
        if self.is_sandbox() {
            self.overrides.version.as_deref()
        } else {
            None
        }
    }

    fn sandbox_purchase_date_override(&self) -> Option<DateTime<Utc>> {
        if self.is_sandbox() {
            self.overrides.purchase_date
        } else {
            None
        }
    }

    /// Override > SDK value > absent.
    fn effective_version<'a>(&'a self, info: &'a CustomerInfo) -> Option<&'a str> {
        self.sandbox_version_override()
            .or(info.original_application_version.as_deref())
    }

    fn effective_purchase_date(&self, info: &CustomerInfo) -> Option<DateTime<Utc>> {
        self.sandbox_purchase_date_override()
            .or(info.original_purchase_date)
    }

    fn check_compatibility(
        &self,
        entitlement: &str,
        version: Option<&str>,
        purchase_date: Option<DateTime<Utc>>,
    ) -> bool {
        if self.registry.is_empty() {
            return false;
        }

        if let Some(version) = version
            && self.registry.find_by_version(entitlement, version).is_some()
        {
            tracing::debug!(
                entitlement = %entitlement,
                version = %version,
                "Entitlement granted by compatible original version"
            );
            return true;
        }

        if let Some(purchased_at) = purchase_date
            && let Some(entry) = self.registry.find_by_purchase_date(entitlement, purchased_at)
        {
            tracing::debug!(
                entitlement = %entitlement,
                purchased_at = %purchased_at,
                cutoff = ?entry.purchased_before_date,
                "Entitlement granted by original purchase date"
            );
            return true;
        }

        tracing::debug!(entitlement = %entitlement, "No backwards compatibility match");
        false
    }
}

impl std::fmt::Debug for EntitlementResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitlementResolver")
            .field("registry", &self.registry)
            .field("sandbox", &self.is_sandbox())
            .field("overrides", &self.overrides)
            .finish()
    }
}
