//! # storefront-kit
//!
//! Convenience layer on top of a subscription purchasing SDK.
//!
//! - [`EntitlementResolver`] decides whether a customer should have an
//!   entitlement, combining the SDK's live grant with registered
//!   backwards-compatibility rules for customers who paid before the app
//!   moved to subscriptions.
//! - [`format_terms`] and [`sort_packages`] render purchase terms for
//!   paywall copy.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_kit::{
//!     BackwardsCompatibilityEntitlement, EntitlementResolver, ResolverOptions, StaticPurchases,
//! };
//!
//! # async fn run() {
//! let resolver = EntitlementResolver::new(
//!     Arc::new(StaticPurchases::empty()),
//!     ResolverOptions::default(),
//! );
//! resolver.register(BackwardsCompatibilityEntitlement::new("premium", ["50", "51"]));
//!
//! let (entitled, _info) = resolver.resolve_with_fallback_fetch("premium").await;
//! # }
//! ```
//!
//! The purchasing SDK itself sits behind [`PurchasesProvider`]. Sandbox
//! detection sits behind [`EnvironmentProbe`].

pub mod config;
pub mod entitlements;
pub mod environment;
pub mod error;
pub mod purchases;
pub mod rest;
pub mod terms;
pub mod types;

pub use config::Config;
pub use entitlements::{
    BackwardsCompatibilityEntitlement, EntitlementRegistry, EntitlementResolver, ResolverOptions,
};
pub use environment::{Environment, EnvironmentProbe, SandboxOverrides};
pub use error::{Result, StorefrontError, StorefrontErrorCode};
pub use purchases::{PurchasesProvider, StaticPurchases};
pub use rest::{RestPurchases, RestPurchasesOptions, DEFAULT_API_URL};
pub use terms::{
    display_title, display_title_recurring, format_terms, period_unit_noun, sort_packages,
    PackageTermsFormatOptions, SortCriterion,
};
pub use types::{
    CustomerInfo, IntroductoryOffer, Package, PackageType, PaymentMode, PeriodUnit,
    SubscriptionPeriod,
};
