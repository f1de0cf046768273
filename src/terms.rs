//! Human-readable purchase terms for packages

use strum::{AsRefStr, EnumString};

use crate::types::{IntroductoryOffer, Package, PackageType, PaymentMode};

/// Controls how [`format_terms`] phrases a package
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageTermsFormatOptions {
    /// "/year" when true, "for 1 Year" when false
    pub is_recurring: bool,
    /// Mention trial or introductory pricing
    pub include_introductory_terms: bool,
}

impl Default for PackageTermsFormatOptions {
    fn default() -> Self {
        Self {
            is_recurring: true,
            include_introductory_terms: true,
        }
    }
}

/// Ordering for [`sort_packages`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SortCriterion {
    /// Shortest billing period first, lifetime last
    TimeAscending,
    /// Exact reverse of `TimeAscending`
    TimeDescending,
    /// Packages with an introductory offer first
    HasIntroductoryPrice,
}

/// Duration title, e.g. "1 Year", "6 Months".
pub fn display_title(kind: &PackageType) -> &str {
    match kind {
        PackageType::Lifetime => "Lifetime",
        PackageType::Annual => "1 Year",
        PackageType::SixMonth => "6 Months",
        PackageType::ThreeMonth => "3 Months",
        PackageType::TwoMonth => "2 Months",
        PackageType::Monthly => "1 Month",
        PackageType::Weekly => "1 Week",
        PackageType::Unknown => "Unknown",
        PackageType::Custom(id) => id,
    }
}

/// Plan title for recurring billing, e.g. "Annual", "Monthly".
pub fn display_title_recurring(kind: &PackageType) -> &str {
    match kind {
        PackageType::Lifetime => "Lifetime",
        PackageType::Annual => "Annual",
        PackageType::SixMonth => "6 Month",
        PackageType::ThreeMonth => "3 Month",
        PackageType::TwoMonth => "2 Month",
        PackageType::Monthly => "Monthly",
        PackageType::Weekly => "Weekly",
        PackageType::Unknown => "Unknown",
        PackageType::Custom(id) => id,
    }
}

/// What one billing cycle is called, e.g. "Year" in "$24.99/year".
pub fn period_unit_noun(kind: &PackageType) -> &str {
    match kind {
        PackageType::Lifetime => "Lifetime",
        PackageType::Annual => "Year",
        PackageType::SixMonth => "6 Months",
        PackageType::ThreeMonth => "3 Months",
        PackageType::TwoMonth => "2 Months",
        PackageType::Monthly => "Month",
        PackageType::Weekly => "Week",
        PackageType::Unknown => "Period",
        PackageType::Custom(id) => id,
    }
}

fn per_unit_suffix(kind: &PackageType, is_recurring: bool) -> String {
    if is_recurring {
        format!("/{}", period_unit_noun(kind).to_lowercase())
    } else {
        format!(" for {}", display_title(kind))
    }
}

fn introductory_terms(offer: &IntroductoryOffer, then: &str) -> String {
    match offer.payment_mode {
        PaymentMode::FreeTrial => format!("{} free trial, then {}", offer.period, then),
        PaymentMode::PayUpFront => format!(
            "{} up front for {}, then {}",
            offer.price_string, offer.period, then
        ),
        PaymentMode::PayAsYouGo => format!(
            "{}/{} for {} {}, then {}",
            offer.price_string,
            offer.period.unit.noun(),
            offer.number_of_periods,
            offer.period.unit.noun_for(offer.number_of_periods),
            then
        ),
        // Let the purchase sheet present the full terms
        PaymentMode::Unknown => offer.price_string.clone(),
    }
}

/// Describe what the customer pays.
///
/// ```
/// use storefront_kit::{format_terms, Package, PackageType, PackageTermsFormatOptions};
///
/// let annual = Package::new("annual", PackageType::Annual, "$24.99");
/// assert_eq!(format_terms(&annual, PackageTermsFormatOptions::default()), "$24.99/year");
/// ```
pub fn format_terms(package: &Package, options: PackageTermsFormatOptions) -> String {
    // One-time purchase: no recurrence or trial to describe
    if package.package_type == PackageType::Lifetime {
        return package.price_string.clone();
    }

    let normal = format!(
        "{}{}",
        package.price_string,
        per_unit_suffix(&package.package_type, options.is_recurring)
    );

    match &package.introductory_offer {
        Some(offer) if options.include_introductory_terms => introductory_terms(offer, &normal),
        _ => normal,
    }
}

/// Return a sorted copy of `packages`. Sorting is stable.
pub fn sort_packages(packages: &[Package], criterion: SortCriterion) -> Vec<Package> {
    let mut sorted = packages.to_vec();
    match criterion {
        SortCriterion::TimeAscending => {
            sorted.sort_by_key(|p| p.package_type.duration_rank());
        }
        SortCriterion::TimeDescending => {
            sorted.sort_by_key(|p| p.package_type.duration_rank());
            sorted.reverse();
        }
        SortCriterion::HasIntroductoryPrice => {
            sorted.sort_by_key(|p| !p.has_introductory_offer());
        }
    }
    sorted
}
