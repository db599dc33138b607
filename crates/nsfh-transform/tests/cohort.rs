use nsfh_model::Wave;
use nsfh_transform::cohort::{
    BinningPolicy, CohortAssigner, equal_width_bins, macro_bins, wave1_primary_bins,
    wave3_primary_bins,
};
use proptest::prelude::*;

#[test]
fn wave1_bins_match_published_cohorts() {
    let bins = wave1_primary_bins().unwrap();
    let labels: Vec<&str> = bins.labels().collect();
    assert_eq!(
        labels,
        vec!["1952–56", "1957–60", "1961–64", "1965–68", "1969–72"]
    );
    assert_eq!(bins.assign(1956).unwrap().label, "1952–56");
    assert_eq!(bins.assign(1957).unwrap().label, "1957–60");
    assert_eq!(bins.assign(1972).unwrap().label, "1969–72");
    assert!(bins.assign(1951).is_none());
    assert!(bins.assign(1973).is_none());
}

#[test]
fn wave3_and_macro_bins_are_open_at_the_ends() {
    let primary = wave3_primary_bins().unwrap();
    assert_eq!(primary.len(), 8);
    assert_eq!(primary.assign(1900).unwrap().label, "≤1939");
    assert_eq!(primary.assign(1995).unwrap().label, "1990–99");
    assert_eq!(primary.assign(2005).unwrap().label, "≥2000");

    let macro_set = macro_bins().unwrap();
    let labels: Vec<&str> = macro_set.labels().collect();
    assert_eq!(labels, vec!["≤1949", "1950–59", "1960–69", "1970–79", "≥1980"]);
}

#[test]
fn equal_width_bins_align_to_multiples() {
    let bins = equal_width_bins("primary", 5, &[1963, 1958, 1971]).unwrap();
    let labels: Vec<&str> = bins.labels().collect();
    assert_eq!(
        labels,
        vec!["1955–59", "1960–64", "1965–69", "1970–74"]
    );
}

#[test]
fn equal_width_bins_of_nothing_is_empty() {
    assert!(equal_width_bins("primary", 5, &[]).unwrap().is_empty());
    assert!(equal_width_bins("primary", 0, &[1960]).is_err());
}

#[test]
fn equal_width_bins_at_the_year_limits_are_errors() {
    let err = equal_width_bins("primary", 5, &[i32::MAX - 2]).unwrap_err();
    assert!(err.to_string().contains("overflow"), "{err}");
    assert!(equal_width_bins("primary", 5, &[i32::MIN]).is_err());

    let bins = equal_width_bins("primary", 5, &[i32::MAX - 10]).unwrap();
    assert_eq!(bins.len(), 1);
}

#[test]
fn fixed_policy_ignores_observations() {
    let policy = BinningPolicy::primary_for(Wave::Wave1).unwrap();
    assert_eq!(policy.resolve(&[1800]).unwrap().len(), 5);
    let policy = BinningPolicy::primary_for(Wave::Wave2).unwrap();
    assert!(policy.resolve(&[]).unwrap().is_empty());
}

#[test]
fn assigner_derives_birth_year_from_reference_year() {
    let assigner = CohortAssigner::new(1987, wave1_primary_bins().unwrap(), macro_bins().unwrap());
    let assignment = assigner.assign(33);
    assert_eq!(assignment.birth_year, 1954);
    assert_eq!(assignment.cohort_primary.as_deref(), Some("1952–56"));
    assert_eq!(assignment.cohort_macro.as_deref(), Some("1950–59"));

    let outside = assigner.assign(60);
    assert_eq!(outside.cohort_primary, None);
    assert_eq!(outside.cohort_macro.as_deref(), Some("≤1949"));
}

proptest! {
    #[test]
    fn equal_width_bins_cover_every_observation_once(
        years in prop::collection::vec(1900i32..2010, 1..60),
    ) {
        let bins = equal_width_bins("primary", 5, &years).unwrap();
        for pair in bins.bins().windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert!(pair[0].start < pair[1].start);
        }
        for year in &years {
            let hits = bins.bins().iter().filter(|bin| bin.contains(*year)).count();
            prop_assert_eq!(hits, 1);
        }
    }

    #[test]
    fn equal_width_bins_ignore_input_order(
        mut years in prop::collection::vec(1900i32..2010, 1..60),
    ) {
        let forward = equal_width_bins("primary", 5, &years).unwrap();
        years.reverse();
        let backward = equal_width_bins("primary", 5, &years).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
