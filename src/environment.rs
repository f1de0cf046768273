//! Sandbox detection and pre-release overrides

use chrono::{DateTime, Utc};
use std::path::Path;

/// File name of the receipt the store installs in sandbox builds.
pub const SANDBOX_RECEIPT_NAME: &str = "sandboxReceipt";

/// Tells the resolver whether it is running against the store sandbox.
///
/// Implement this for custom platform checks. Tests use [`Environment`].
pub trait EnvironmentProbe: Send + Sync {
    fn is_sandbox(&self) -> bool;
}

/// Fixed environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    /// Classify by the app's receipt location. Only a receipt literally named
    /// `sandboxReceipt` counts as sandbox.
    pub fn from_receipt_path(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some(SANDBOX_RECEIPT_NAME) => Self::Sandbox,
            _ => Self::Production,
        }
    }
}

impl EnvironmentProbe for Environment {
    fn is_sandbox(&self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

/// Values substituted for the customer's original version and purchase date
/// while testing in the sandbox, where the store reports placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxOverrides {
    pub version: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
}

impl SandboxOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_purchase_date(mut self, date: DateTime<Utc>) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_none() && self.purchase_date.is_none()
    }
}
