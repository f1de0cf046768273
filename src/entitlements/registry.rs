//! Registered backwards-compatibility rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Grants an entitlement to customers from before the move to subscriptions,
/// identified either by the build they first installed or by when they first
/// purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardsCompatibilityEntitlement {
    pub entitlement_name: String,
    /// Build numbers (not marketing versions) that qualify
    #[serde(default)]
    pub compatible_versions: HashSet<String>,
    /// Customers whose original purchase is strictly before this instant qualify
    #[serde(default)]
    pub purchased_before_date: Option<DateTime<Utc>>,
}

impl BackwardsCompatibilityEntitlement {
    pub fn new<I, S>(entitlement_name: impl Into<String>, compatible_versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entitlement_name: entitlement_name.into(),
            compatible_versions: compatible_versions.into_iter().map(Into::into).collect(),
            purchased_before_date: None,
        }
    }

    pub fn purchased_before(mut self, date: DateTime<Utc>) -> Self {
        self.purchased_before_date = Some(date);
        self
    }

    /// Registration identity. Two entries with the same name are the same
    /// registration even when their versions or dates differ.
    pub fn registration_key(&self) -> &str {
        &self.entitlement_name
    }

    pub fn matches_version(&self, entitlement: &str, version: &str) -> bool {
        self.entitlement_name == entitlement && self.compatible_versions.contains(version)
    }

    pub fn matches_purchase_date(&self, entitlement: &str, purchased_at: DateTime<Utc>) -> bool {
        self.entitlement_name == entitlement
            && self
                .purchased_before_date
                .is_some_and(|cutoff| cutoff > purchased_at)
    }
}

/// Insertion-ordered set of rules, at most one per entitlement name.
///
/// Safe to share across threads. A poisoned lock is recovered since the
/// registry only holds plain data.
#[derive(Debug, Default)]
pub struct EntitlementRegistry {
    entries: RwLock<Vec<BackwardsCompatibilityEntitlement>>,
}

impl EntitlementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry, keeping the first entry for each name.
    pub fn from_entries(entries: impl IntoIterator<Item = BackwardsCompatibilityEntitlement>) -> Self {
        let registry = Self::new();
        for entry in entries {
            registry.register(entry);
        }
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<BackwardsCompatibilityEntitlement>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<BackwardsCompatibilityEntitlement>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `entry` unless its name is already registered.
    ///
    /// Returns whether the entry was added. The existing registration is
    /// never replaced.
    pub fn register(&self, entry: BackwardsCompatibilityEntitlement) -> bool {
        let mut entries = self.write();
        if entries
            .iter()
            .any(|e| e.registration_key() == entry.registration_key())
        {
            return false;
        }
        entries.push(entry);
        true
    }

    /// Remove every entry with this name. Returns how many were removed.
    pub fn unregister(&self, entitlement_name: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|e| e.registration_key() != entitlement_name);
        before - entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Snapshot in insertion order.
    pub fn entries(&self) -> Vec<BackwardsCompatibilityEntitlement> {
        self.read().clone()
    }

    /// First entry, in insertion order, granting `entitlement` to `version`.
    pub fn find_by_version(&self, entitlement: &str, version: &str) -> Option<BackwardsCompatibilityEntitlement> {
        self.read()
            .iter()
            .find(|e| e.matches_version(entitlement, version))
            .cloned()
    }

    /// First entry, in insertion order, whose cutoff is after `purchased_at`.
    pub fn find_by_purchase_date(
        &self,
        entitlement: &str,
        purchased_at: DateTime<Utc>,
    ) -> Option<BackwardsCompatibilityEntitlement> {
        self.read()
            .iter()
            .find(|e| e.matches_purchase_date(entitlement, purchased_at))
            .cloned()
    }
}
