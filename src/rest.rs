//! HTTP purchases provider backed by the subscriber REST endpoint

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{map_status_to_error_code, Result, StorefrontError};
use crate::purchases::PurchasesProvider;
use crate::types::{CustomerInfo, SubscriberResponse};

/// Default purchasing backend URL
pub const DEFAULT_API_URL: &str = "https://api.revenuecat.com";

/// Configuration options for [`RestPurchases`]
#[derive(Debug, Clone, Default)]
pub struct RestPurchasesOptions {
    /// Backend URL (default: "https://api.revenuecat.com")
    pub base_url: Option<String>,
    /// `X-Platform` header sent with each request (default: none)
    pub platform: Option<String>,
}

/// Fetches customer records over HTTP.
///
/// One request per call and no retries.
pub struct RestPurchases {
    api_key: String,
    app_user_id: String,
    base_url: String,
    platform: Option<String>,
    http: HttpClient,
}

impl RestPurchases {
    /// Create a new provider.
    ///
    /// # Arguments
    /// * `api_key` - Backend API key
    /// * `app_user_id` - The subscriber to look up
    /// * `options` - Optional configuration
    pub fn new(api_key: &str, app_user_id: &str, options: RestPurchasesOptions) -> Result<Self> {
        if api_key.is_empty() {
            return Err(StorefrontError::validation("api_key is required"));
        }
        if app_user_id.is_empty() {
            return Err(StorefrontError::validation("app_user_id is required"));
        }

        let base_url = options
            .base_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        url::Url::parse(&base_url).map_err(|_| StorefrontError::validation("Invalid base URL"))?;

        let http = HttpClient::builder()
            .user_agent(concat!("storefront-kit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorefrontError::network(e.to_string()))?;

        Ok(Self {
            api_key: api_key.to_string(),
            app_user_id: app_user_id.to_string(),
            base_url,
            platform: options.platform,
            http,
        })
    }

    pub fn app_user_id(&self) -> &str {
        &self.app_user_id
    }

    fn subscriber_url(&self) -> String {
        format!(
            "{}/v1/subscribers/{}",
            self.base_url,
            urlencoding::encode(&self.app_user_id)
        )
    }

    async fn get_subscriber(&self) -> Result<SubscriberResponse> {
        let mut request = self
            .http
            .get(self.subscriber_url())
            .header("Authorization", format!("Bearer {}", self.api_key));

        if let Some(platform) = &self.platform {
            request = request.header("X-Platform", platform);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorefrontError::network(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status().as_u16();

        if !response.status().is_success() {
            #[derive(Deserialize)]
            struct ErrorResponse {
                message: Option<String>,
            }

            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Request failed: {}", status));

            return Err(StorefrontError::with_status(
                map_status_to_error_code(status),
                message,
                status,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| StorefrontError::network(e.to_string()))
    }
}

#[async_trait]
impl PurchasesProvider for RestPurchases {
    async fn customer_info(&self) -> Result<CustomerInfo> {
        let response = self.get_subscriber().await?;
        Ok(response.into_customer_info(Utc::now()))
    }
}

impl std::fmt::Debug for RestPurchases {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPurchases")
            .field("base_url", &self.base_url)
            .field("app_user_id", &self.app_user_id)
            .field("platform", &self.platform)
            .finish()
    }
}
