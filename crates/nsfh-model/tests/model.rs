use nsfh_model::{
    AnalyticRecord, BinSet, CohortAssignment, CohortBin, FieldValue, MissingReason, ModelError,
    PartnershipRecord, Sex, Wave,
};

fn partnership(ever_married: Option<bool>, ever_cohabited: Option<bool>) -> PartnershipRecord {
    PartnershipRecord {
        respondent_id: "R1".to_string(),
        age: 30,
        sex: Sex::Female,
        num_marriages: None,
        ever_married,
        remarried_2plus: None,
        num_cohab_partners: None,
        ever_cohabited,
    }
}

fn assignment(birth_year: i32) -> CohortAssignment {
    CohortAssignment {
        birth_year,
        cohort_primary: Some("1955–59".to_string()),
        cohort_macro: Some("1950–59".to_string()),
    }
}

#[test]
fn sex_codes_follow_instrument_coding() {
    assert_eq!(Sex::from_code(1), Some(Sex::Male));
    assert_eq!(Sex::from_code(2), Some(Sex::Female));
    assert_eq!(Sex::from_code(9), None);
    assert!(Sex::Female < Sex::Male);
}

#[test]
fn ever_partnered_treats_missing_as_false() {
    assert!(!partnership(None, None).ever_partnered());
    assert!(partnership(None, Some(true)).ever_partnered());
    assert!(partnership(Some(true), None).ever_partnered());
    assert!(!partnership(Some(false), None).ever_partnered());
}

#[test]
fn analytic_record_enforces_remarriage_implication() {
    let mut source = partnership(None, Some(false));
    source.remarried_2plus = Some(true);
    let record = AnalyticRecord::from_parts(source, assignment(1957));
    assert_eq!(record.ever_married, Some(true));
    assert!(record.ever_partnered);
    assert!(record.is_consistent());
}

#[test]
fn analytic_record_flags_age_ceiling_without_filtering() {
    let mut source = partnership(Some(true), None);
    source.age = 36;
    let record = AnalyticRecord::from_parts(source, assignment(1951));
    assert!(!record.age_le_35);
    assert_eq!(record.birth_year, 1951);
}

#[test]
fn field_value_never_defaults_missing_to_zero() {
    let value = FieldValue::Missing(MissingReason::Sentinel(99));
    assert_eq!(value.value(), None);
    assert_eq!(value.count(), None);
    assert_eq!(value.at_least(1), None);
    assert_eq!(FieldValue::Present(-1).count(), None);
    assert_eq!(FieldValue::Present(2).at_least(2), Some(true));
}

#[test]
fn negative_count_reads_as_missing() {
    let value = FieldValue::Present(-3).as_count();
    assert_eq!(value, FieldValue::Missing(MissingReason::Negative(-3)));
    assert_eq!(value.at_least(1), None);
    assert_eq!(FieldValue::Present(0).as_count(), FieldValue::Present(0));
    let sentinel = FieldValue::Missing(MissingReason::Sentinel(99));
    assert_eq!(sentinel.as_count(), sentinel);
}

#[test]
fn bin_set_accepts_contiguous_bins() {
    let set = BinSet::new(
        "macro",
        vec![
            CohortBin::new("≤1949", None, Some(1950)),
            CohortBin::closed("1950–59", 1950, 1959),
            CohortBin::new("≥1960", Some(1960), None),
        ],
    )
    .unwrap();
    assert_eq!(set.assign(1900).map(|b| b.label.as_str()), Some("≤1949"));
    assert_eq!(set.assign(1959).map(|b| b.label.as_str()), Some("1950–59"));
    assert_eq!(set.assign(2030).map(|b| b.label.as_str()), Some("≥1960"));
    assert_eq!(set.position("≥1960"), Some(2));
}

#[test]
fn bin_set_rejects_gaps_and_overlaps() {
    let gap = BinSet::new(
        "gap",
        vec![
            CohortBin::closed("a", 1950, 1954),
            CohortBin::closed("b", 1956, 1960),
        ],
    );
    assert!(matches!(gap, Err(ModelError::NotContiguous { .. })));

    let overlap = BinSet::new(
        "overlap",
        vec![
            CohortBin::closed("a", 1950, 1955),
            CohortBin::closed("b", 1955, 1960),
        ],
    );
    assert!(matches!(overlap, Err(ModelError::NotContiguous { .. })));

    let open_middle = BinSet::new(
        "open",
        vec![
            CohortBin::closed("a", 1950, 1955),
            CohortBin::new("b", None, Some(1970)),
        ],
    );
    assert!(matches!(
        open_middle,
        Err(ModelError::OpenStartNotFirst { .. })
    ));
}

#[test]
fn bin_set_rejects_duplicate_labels() {
    let result = BinSet::new(
        "dup",
        vec![
            CohortBin::closed("a", 1950, 1954),
            CohortBin::closed("a", 1955, 1959),
        ],
    );
    assert!(matches!(result, Err(ModelError::DuplicateLabel { .. })));
}

#[test]
fn wave_parses_from_cli_spellings() {
    assert_eq!("2".parse::<Wave>(), Ok(Wave::Wave2));
    assert_eq!("Wave3".parse::<Wave>(), Ok(Wave::Wave3));
    assert!("wave4".parse::<Wave>().is_err());
    assert_eq!(Wave::Wave1.default_reference_year(), 1987);
    assert!(Wave::Wave3.requires_roster());
}
