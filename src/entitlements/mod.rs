//! Entitlement resolution with backwards-compatibility grandfathering

pub mod registry;
pub mod resolver;

pub use registry::{BackwardsCompatibilityEntitlement, EntitlementRegistry};
pub use resolver::{EntitlementResolver, ResolverOptions};
