//! Read-only views of the records the purchasing SDK hands us

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, EnumString};

/// Snapshot of a customer as reported by the purchasing SDK.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    /// Entitlement name -> currently active via the purchasing SDK
    #[serde(default)]
    pub entitlements: BTreeMap<String, bool>,
    /// Build identifier of the user's first install. Sandbox builds always
    /// report a placeholder here.
    #[serde(default)]
    pub original_application_version: Option<String>,
    /// First purchase instant. Same sandbox caveat as the version.
    #[serde(default)]
    pub original_purchase_date: Option<DateTime<Utc>>,
}

impl CustomerInfo {
    /// Whether the SDK reports this entitlement as live.
    pub fn is_entitlement_active(&self, entitlement: &str) -> bool {
        self.entitlements.get(entitlement).copied().unwrap_or(false)
    }
}

/// Billing period category of a package.
///
/// Serialized as the purchasing backend's package identifier
/// (`$rc_annual`, `$rc_monthly`, ...). Identifiers we don't know are kept
/// verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageType {
    Lifetime,
    Annual,
    SixMonth,
    ThreeMonth,
    TwoMonth,
    Monthly,
    Weekly,
    Unknown,
    Custom(String),
}

impl PackageType {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Lifetime => "$rc_lifetime",
            Self::Annual => "$rc_annual",
            Self::SixMonth => "$rc_six_month",
            Self::ThreeMonth => "$rc_three_month",
            Self::TwoMonth => "$rc_two_month",
            Self::Monthly => "$rc_monthly",
            Self::Weekly => "$rc_weekly",
            Self::Unknown => "",
            Self::Custom(id) => id,
        }
    }

    /// Relative billing duration, shortest first. Unknown durations rank
    /// after every known recurring period; lifetime is always the longest.
    pub fn duration_rank(&self) -> u8 {
        match self {
            Self::Weekly => 0,
            Self::Monthly => 1,
            Self::TwoMonth => 2,
            Self::ThreeMonth => 3,
            Self::SixMonth => 4,
            Self::Annual => 5,
            Self::Unknown | Self::Custom(_) => 6,
            Self::Lifetime => 7,
        }
    }
}

impl From<&str> for PackageType {
    fn from(s: &str) -> Self {
        match s {
            "$rc_lifetime" => Self::Lifetime,
            "$rc_annual" => Self::Annual,
            "$rc_six_month" => Self::SixMonth,
            "$rc_three_month" => Self::ThreeMonth,
            "$rc_two_month" => Self::TwoMonth,
            "$rc_monthly" => Self::Monthly,
            "$rc_weekly" => Self::Weekly,
            "" => Self::Unknown,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for PackageType {
    fn from(s: String) -> Self {
        match PackageType::from(s.as_str()) {
            Self::Custom(_) => Self::Custom(s),
            known => known,
        }
    }
}

impl From<PackageType> for String {
    fn from(kind: PackageType) -> Self {
        match kind {
            PackageType::Custom(id) => id,
            known => known.identifier().to_string(),
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// How an introductory offer is paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum PaymentMode {
    /// Nothing charged during the intro period
    FreeTrial,
    /// Intro price charged once for the whole intro period
    PayUpFront,
    /// Intro price charged every cycle for a number of cycles
    PayAsYouGo,
    /// A mode this crate does not understand
    #[serde(other)]
    Unknown,
}

/// Calendar unit of a subscription period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

impl PeriodUnit {
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// The noun, pluralized unless `count` is exactly one.
    pub fn noun_for(&self, count: u32) -> String {
        if count == 1 {
            self.noun().to_string()
        } else {
            format!("{}s", self.noun())
        }
    }
}

/// A count of period units, e.g. 3 days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPeriod {
    pub value: u32,
    pub unit: PeriodUnit,
}

impl SubscriptionPeriod {
    pub fn new(value: u32, unit: PeriodUnit) -> Self {
        Self { value, unit }
    }
}

impl std::fmt::Display for SubscriptionPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit.noun_for(self.value))
    }
}

/// Introductory (trial or discounted) terms attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroductoryOffer {
    pub payment_mode: PaymentMode,
    /// Pre-localized intro price
    pub price_string: String,
    /// Length of one intro period
    pub period: SubscriptionPeriod,
    /// Billing cycles the intro price applies to (pay-as-you-go)
    #[serde(default = "default_number_of_periods")]
    pub number_of_periods: u32,
}

fn default_number_of_periods() -> u32 {
    1
}

/// A purchasable offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub identifier: String,
    pub package_type: PackageType,
    /// Pre-localized standard price
    pub price_string: String,
    #[serde(default)]
    pub introductory_offer: Option<IntroductoryOffer>,
}

impl Package {
    pub fn new(
        identifier: impl Into<String>,
        package_type: PackageType,
        price_string: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            package_type,
            price_string: price_string.into(),
            introductory_offer: None,
        }
    }

    pub fn with_introductory_offer(mut self, offer: IntroductoryOffer) -> Self {
        self.introductory_offer = Some(offer);
        self
    }

    pub fn has_introductory_offer(&self) -> bool {
        self.introductory_offer.is_some()
    }
}

/// Subscriber payload from the purchasing backend's REST API
#[derive(Debug, Deserialize)]
pub(crate) struct SubscriberResponse {
    pub request_date: Option<DateTime<Utc>>,
    pub subscriber: SubscriberBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriberBody {
    #[serde(default)]
    pub entitlements: BTreeMap<String, EntitlementResponse>,
    pub original_application_version: Option<String>,
    pub original_purchase_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntitlementResponse {
    pub expires_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub grace_period_expires_date: Option<DateTime<Utc>>,
}

impl EntitlementResponse {
    fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_date {
            // Non-expiring (lifetime) grant
            None => true,
            Some(expires) => {
                let until = self
                    .grace_period_expires_date
                    .map_or(expires, |grace| grace.max(expires));
                until > now
            }
        }
    }
}

impl SubscriberResponse {
    /// Evaluate the payload at the backend's request time, falling back to `now`.
    pub fn into_customer_info(self, now: DateTime<Utc>) -> CustomerInfo {
        let at = self.request_date.unwrap_or(now);
        CustomerInfo {
            entitlements: self
                .subscriber
                .entitlements
                .into_iter()
                .map(|(name, e)| {
                    let active = e.is_active_at(at);
                    (name, active)
                })
                .collect(),
            original_application_version: self.subscriber.original_application_version,
            original_purchase_date: self.subscriber.original_purchase_date,
        }
    }
}
