use chrono::{DateTime, Utc};
use std::env;
use std::path::PathBuf;

use crate::environment::{Environment, SandboxOverrides};
use crate::error::{Result, StorefrontError};
use crate::rest::{RestPurchases, RestPurchasesOptions, DEFAULT_API_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub sandbox: bool,
    pub receipt_path: Option<PathBuf>,
    pub sandbox_version: Option<String>,
    pub sandbox_purchase_date: Option<DateTime<Utc>>,
    pub api_url: String,
    pub api_key: Option<String>,
    pub app_user_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let sandbox = lookup("STOREFRONT_ENV")
            .map(|v| v.eq_ignore_ascii_case("sandbox"))
            .unwrap_or(false);

        let sandbox_purchase_date = lookup("STOREFRONT_SANDBOX_PURCHASE_DATE").and_then(|raw| {
            match DateTime::parse_from_rfc3339(&raw) {
                Ok(date) => Some(date.with_timezone(&Utc)),
                Err(e) => {
                    tracing::warn!(value = %raw, error = %e, "Ignoring unparsable STOREFRONT_SANDBOX_PURCHASE_DATE");
                    None
                }
            }
        });

        Self {
            sandbox,
            receipt_path: lookup("STOREFRONT_RECEIPT_PATH").map(PathBuf::from),
            sandbox_version: lookup("STOREFRONT_SANDBOX_VERSION").filter(|v| !v.is_empty()),
            sandbox_purchase_date,
            api_url: lookup("STOREFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: lookup("STOREFRONT_API_KEY").filter(|v| !v.is_empty()),
            app_user_id: lookup("STOREFRONT_APP_USER_ID").filter(|v| !v.is_empty()),
        }
    }

    /// Explicit `STOREFRONT_ENV=sandbox` or a sandbox receipt means sandbox.
    pub fn environment(&self) -> Environment {
        if self.sandbox {
            return Environment::Sandbox;
        }
        self.receipt_path
            .as_deref()
            .map(Environment::from_receipt_path)
            .unwrap_or(Environment::Production)
    }

    pub fn overrides(&self) -> SandboxOverrides {
        SandboxOverrides {
            version: self.sandbox_version.clone(),
            purchase_date: self.sandbox_purchase_date,
        }
    }

    pub fn rest_purchases(&self) -> Result<RestPurchases> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| StorefrontError::config("STOREFRONT_API_KEY is not set"))?;
        let app_user_id = self
            .app_user_id
            .as_deref()
            .ok_or_else(|| StorefrontError::config("STOREFRONT_APP_USER_ID is not set"))?;

        RestPurchases::new(
            api_key,
            app_user_id,
            RestPurchasesOptions {
                base_url: Some(self.api_url.clone()),
                platform: None,
            },
        )
    }
}
