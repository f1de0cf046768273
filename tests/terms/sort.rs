//! Tests for sort_packages.

#[path = "../common/mod.rs"]
mod common;
use common::*;

fn trial() -> IntroductoryOffer {
    intro(PaymentMode::FreeTrial, "$0.00", 1, PeriodUnit::Week, 1)
}

#[test]
fn test_time_ascending() {
    let packages = vec![
        package("annual", PackageType::Annual, "$24.99"),
        package("weekly", PackageType::Weekly, "$0.99"),
        package("monthly", PackageType::Monthly, "$2.99"),
    ];

    let sorted = sort_packages(&packages, SortCriterion::TimeAscending);
    assert_eq!(identifiers(&sorted), vec!["weekly", "monthly", "annual"]);
}

#[test]
fn test_time_descending_is_exact_reverse() {
    let packages = vec![
        package("annual", PackageType::Annual, "$24.99"),
        package("weekly", PackageType::Weekly, "$0.99"),
        package("monthly", PackageType::Monthly, "$2.99"),
        package("monthly-b", PackageType::Monthly, "$3.99"),
    ];

    let mut ascending = sort_packages(&packages, SortCriterion::TimeAscending);
    let descending = sort_packages(&packages, SortCriterion::TimeDescending);
    ascending.reverse();
    assert_eq!(ascending, descending);
}

#[test]
fn test_full_duration_ladder() {
    let packages = vec![
        package("lifetime", PackageType::Lifetime, "$99.99"),
        package("six", PackageType::SixMonth, "$14.99"),
        package("annual", PackageType::Annual, "$24.99"),
        package("two", PackageType::TwoMonth, "$5.99"),
        package("weekly", PackageType::Weekly, "$0.99"),
        package("three", PackageType::ThreeMonth, "$7.99"),
        package("monthly", PackageType::Monthly, "$2.99"),
    ];

    let sorted = sort_packages(&packages, SortCriterion::TimeAscending);
    assert_eq!(
        identifiers(&sorted),
        vec!["weekly", "monthly", "two", "three", "six", "annual", "lifetime"]
    );
}

#[test]
fn test_lifetime_stays_last_with_unknown_periods() {
    let packages = vec![
        package("life", PackageType::Lifetime, "$99.99"),
        package("unk", PackageType::Unknown, "$4.99"),
        package("semester", PackageType::Custom("semester".into()), "$19.99"),
        package("wk", PackageType::Weekly, "$0.99"),
        package("annual", PackageType::Annual, "$24.99"),
    ];

    let ascending = sort_packages(&packages, SortCriterion::TimeAscending);
    assert_eq!(
        identifiers(&ascending),
        vec!["wk", "annual", "unk", "semester", "life"]
    );

    let descending = sort_packages(&packages, SortCriterion::TimeDescending);
    assert_eq!(identifiers(&descending)[0], "life");
}

#[test]
fn test_ties_keep_input_order() {
    let packages = vec![
        package("monthly-a", PackageType::Monthly, "$2.99"),
        package("weekly", PackageType::Weekly, "$0.99"),
        package("monthly-b", PackageType::Monthly, "$3.99"),
    ];

    let sorted = sort_packages(&packages, SortCriterion::TimeAscending);
    assert_eq!(identifiers(&sorted), vec!["weekly", "monthly-a", "monthly-b"]);
}

#[test]
fn test_has_introductory_price_is_stable_partition() {
    let packages = vec![
        package("a", PackageType::Annual, "$24.99"),
        package("b", PackageType::Monthly, "$2.99").with_introductory_offer(trial()),
        package("c", PackageType::Weekly, "$0.99"),
        package("d", PackageType::Annual, "$19.99").with_introductory_offer(trial()),
        package("e", PackageType::Lifetime, "$99.99"),
    ];

    let sorted = sort_packages(&packages, SortCriterion::HasIntroductoryPrice);
    assert_eq!(identifiers(&sorted), vec!["b", "d", "a", "c", "e"]);
}

#[test]
fn test_sort_leaves_input_untouched() {
    let packages = vec![
        package("annual", PackageType::Annual, "$24.99"),
        package("weekly", PackageType::Weekly, "$0.99"),
    ];
    let before = packages.clone();

    let _ = sort_packages(&packages, SortCriterion::TimeAscending);
    assert_eq!(packages, before);
}

#[test]
fn test_empty_input() {
    assert!(sort_packages(&[], SortCriterion::TimeDescending).is_empty());
}
