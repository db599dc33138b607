mod common;

use common::{headers, table};
use nsfh_model::{DerivationNote, FieldValue, MissingReason, ReasonCode, Sex, Wave};
use nsfh_transform::{SentinelNormalizer, TransformError, bind_adapter};

#[test]
fn wave1_maps_lifetime_counts() {
    let raw = table(
        "wave1.tsv",
        &["MCASEID", "M2BP01", "M2DP01", "M95", "NUMCOHAB"],
        &[&["1001", "30", "2", "2", "1"], &["1002", "28", "1", "0", "0"]],
    );
    let adapter = bind_adapter(Wave::Wave1, raw.headers(), raw.name()).unwrap();
    let sentinels = SentinelNormalizer::for_wave(Wave::Wave1);

    let first = adapter.adapt(&raw.record(0).unwrap(), &sentinels);
    assert_eq!(first.respondent_id, "1001");
    let record = first.outcome.unwrap();
    assert_eq!(record.sex, Sex::Female);
    assert_eq!(record.age, 30);
    assert_eq!(record.num_marriages, Some(2));
    assert_eq!(record.ever_married, Some(true));
    assert_eq!(record.remarried_2plus, Some(true));
    assert_eq!(record.ever_cohabited, Some(true));
    assert_eq!(first.audit.len(), adapter.audit_fields().len());

    let second = adapter.adapt(&raw.record(1).unwrap(), &sentinels).outcome.unwrap();
    assert_eq!(second.sex, Sex::Male);
    assert_eq!(second.ever_married, Some(false));
    assert!(!second.ever_partnered());
}

#[test]
fn wave1_sentinel_marriage_count_is_missing() {
    let raw = table(
        "wave1.tsv",
        &["MCASEID", "M2BP01", "M2DP01", "M95", "NUMCOHAB"],
        &[&["1003", "33", "1", "99", "0"]],
    );
    let adapter = bind_adapter(Wave::Wave1, raw.headers(), raw.name()).unwrap();
    let harmonized = adapter.adapt(
        &raw.record(0).unwrap(),
        &SentinelNormalizer::for_wave(Wave::Wave1),
    );
    let record = harmonized.outcome.unwrap();
    assert_eq!(record.num_marriages, None);
    assert_eq!(record.ever_married, None);
    assert_eq!(record.remarried_2plus, None);
    let audit = harmonized
        .audit
        .iter()
        .find(|field| field.field == "M95")
        .unwrap();
    assert_eq!(audit.raw.as_deref(), Some("99"));
    assert_eq!(audit.value, FieldValue::Missing(MissingReason::Sentinel(99)));
}

#[test]
fn wave1_negative_counts_are_missing() {
    let raw = table(
        "wave1.tsv",
        &["MCASEID", "M2BP01", "M2DP01", "M95", "NUMCOHAB"],
        &[&["1004", "28", "2", "-3", "-1"]],
    );
    let adapter = bind_adapter(Wave::Wave1, raw.headers(), raw.name()).unwrap();
    let harmonized = adapter.adapt(
        &raw.record(0).unwrap(),
        &SentinelNormalizer::for_wave(Wave::Wave1),
    );
    let record = harmonized.outcome.unwrap();
    assert_eq!(record.num_marriages, None);
    assert_eq!(record.ever_married, None);
    assert_eq!(record.remarried_2plus, None);
    assert_eq!(record.num_cohab_partners, None);
    assert_eq!(record.ever_cohabited, None);
    assert!(!record.ever_partnered());

    let m95 = harmonized
        .audit
        .iter()
        .find(|field| field.field == "M95")
        .unwrap();
    assert_eq!(m95.raw.as_deref(), Some("-3"));
    assert_eq!(m95.value, FieldValue::Missing(MissingReason::Negative(-3)));
    assert_eq!(m95.value.to_string(), "missing:negative(-3)");
}

#[test]
fn unknown_sex_code_excludes_respondent() {
    let raw = table(
        "wave1.tsv",
        &["M2BP01", "M2DP01", "M95", "NUMCOHAB"],
        &[&["30", "9", "1", "0"], &["", "1", "1", "0"]],
    );
    let adapter = bind_adapter(Wave::Wave1, raw.headers(), raw.name()).unwrap();
    let sentinels = SentinelNormalizer::for_wave(Wave::Wave1);
    let first = adapter.adapt(&raw.record(0).unwrap(), &sentinels);
    assert_eq!(first.respondent_id, "row-1");
    assert_eq!(first.outcome.unwrap_err(), ReasonCode::MissingSex);
    let second = adapter.adapt(&raw.record(1).unwrap(), &sentinels);
    assert_eq!(second.outcome.unwrap_err(), ReasonCode::MissingAge);
}

#[test]
fn missing_required_column_fails_binding() {
    let cols = headers(&["MCASEID", "M2BP01", "M2DP01", "NUMCOHAB"]);
    let err = bind_adapter(Wave::Wave1, &cols, "wave1.tsv").err().unwrap();
    assert!(matches!(err, TransformError::Ingest(_)));
    assert!(err.to_string().contains("M95"));
}

#[test]
fn wave2_combines_counts_with_yes_no_items() {
    let raw = table(
        "wave2.tsv",
        &["MA8", "MA7", "MI41", "MI140", "MI40", "MI42"],
        &[
            &["30", "2", "0", "98", "1", "2"],
            &["31", "1", "97", "98", "99", "9"],
            &["29", "1", "3", "2", "1", "1"],
        ],
    );
    let adapter = bind_adapter(Wave::Wave2, raw.headers(), raw.name()).unwrap();
    let sentinels = SentinelNormalizer::for_wave(Wave::Wave2);

    let first = adapter.adapt(&raw.record(0).unwrap(), &sentinels);
    assert_eq!(first.notes, vec![DerivationNote::SincePriorWaveCounts]);
    let first = first.outcome.unwrap();
    assert_eq!(first.ever_married, Some(true));
    assert_eq!(first.remarried_2plus, Some(false));
    assert_eq!(first.num_cohab_partners, None);
    assert_eq!(first.ever_cohabited, Some(false));

    let second = adapter.adapt(&raw.record(1).unwrap(), &sentinels).outcome.unwrap();
    assert_eq!(second.ever_married, None);
    assert_eq!(second.remarried_2plus, None);
    assert_eq!(second.ever_cohabited, None);
    assert!(!second.ever_partnered());

    let third = adapter.adapt(&raw.record(2).unwrap(), &sentinels).outcome.unwrap();
    assert_eq!(third.remarried_2plus, Some(true));
    assert_eq!(third.num_cohab_partners, Some(2));
}

#[test]
fn wave2_sentinel_age_is_missing_age() {
    let raw = table(
        "wave2.tsv",
        &["MA8", "MA7", "MI41", "MI140", "MI40", "MI42"],
        &[&["98", "2", "0", "0", "2", "2"]],
    );
    let adapter = bind_adapter(Wave::Wave2, raw.headers(), raw.name()).unwrap();
    let harmonized = adapter.adapt(
        &raw.record(0).unwrap(),
        &SentinelNormalizer::for_wave(Wave::Wave2),
    );
    assert_eq!(harmonized.outcome.unwrap_err(), ReasonCode::MissingAge);
}

#[test]
fn wave3_resolves_aliases_and_current_cohabitation() {
    let raw = table(
        "wave3.tsv",
        &[
            "CASENUM", "DOBY", "DOBM", "IDATYY", "IDATMM", "IDATDD", "RSEX", "MARSTAT", "MB", "COH",
        ],
        &[
            &["7", "70", "3", "2002", "3", "14", "2", "3", "2", "1"],
            &["8", "75", "", "2002", "", "", "1", "5", "", "2"],
        ],
    );
    let adapter = bind_adapter(Wave::Wave3, raw.headers(), raw.name()).unwrap();
    let sentinels = SentinelNormalizer::for_wave(Wave::Wave3);

    let first = adapter.adapt(&raw.record(0).unwrap(), &sentinels);
    assert_eq!(first.respondent_id, "7");
    assert!(first.notes.contains(&DerivationNote::CurrentCohabitationStatus));
    let sex_audit = first.audit.iter().find(|f| f.field == "SEX").unwrap();
    assert_eq!(sex_audit.column.as_deref(), Some("RSEX"));
    let first = first.outcome.unwrap();
    assert_eq!(first.age, 31);
    assert_eq!(first.sex, Sex::Female);
    assert_eq!(first.num_marriages, Some(2));
    assert_eq!(first.remarried_2plus, Some(true));
    assert_eq!(first.num_cohab_partners, None);
    assert_eq!(first.ever_cohabited, Some(true));

    let second = adapter.adapt(&raw.record(1).unwrap(), &sentinels).outcome.unwrap();
    assert_eq!(second.age, 27);
    assert_eq!(second.num_marriages, Some(0));
    assert_eq!(second.ever_married, Some(false));
    assert_eq!(second.ever_cohabited, Some(false));
}

#[test]
fn wave3_without_cohabitation_source_is_missing() {
    let raw = table(
        "wave3.tsv",
        &["CASEID", "DOBY", "IDATYY", "SEX", "MS"],
        &[&["A1", "71", "2002", "1", "1"]],
    );
    let adapter = bind_adapter(Wave::Wave3, raw.headers(), raw.name()).unwrap();
    let harmonized = adapter.adapt(
        &raw.record(0).unwrap(),
        &SentinelNormalizer::for_wave(Wave::Wave3),
    );
    assert!(harmonized.notes.contains(&DerivationNote::CohabitationUnavailable));
    assert!(harmonized.notes.contains(&DerivationNote::MarriedBeforeAssumedFirst));
    let record = harmonized.outcome.unwrap();
    assert_eq!(record.ever_cohabited, None);
    assert_eq!(record.remarried_2plus, Some(false));
    assert_eq!(record.num_marriages, Some(1));
    assert!(record.ever_partnered());
}

#[test]
fn wave3_married_before_answer_is_not_assumed() {
    let raw = table(
        "wave3.tsv",
        &["CASENUM", "DOBY", "IDATYY", "SEX", "MS", "MB", "COH"],
        &[
            &["11", "70", "2002", "2", "2", "", "2"],
            &["12", "70", "2002", "2", "2", "2", "2"],
            &["13", "70", "2002", "1", "5", "", "2"],
        ],
    );
    let adapter = bind_adapter(Wave::Wave3, raw.headers(), raw.name()).unwrap();
    let sentinels = SentinelNormalizer::for_wave(Wave::Wave3);

    let blank = adapter.adapt(&raw.record(0).unwrap(), &sentinels);
    assert!(blank.notes.contains(&DerivationNote::MarriedBeforeAssumedFirst));
    let blank = blank.outcome.unwrap();
    assert_eq!(blank.ever_married, Some(true));
    assert_eq!(blank.remarried_2plus, Some(false));
    assert_eq!(blank.num_marriages, Some(1));

    let answered = adapter.adapt(&raw.record(1).unwrap(), &sentinels);
    assert!(!answered.notes.contains(&DerivationNote::MarriedBeforeAssumedFirst));
    assert_eq!(answered.outcome.unwrap().num_marriages, Some(2));

    let never = adapter.adapt(&raw.record(2).unwrap(), &sentinels);
    assert!(!never.notes.contains(&DerivationNote::MarriedBeforeAssumedFirst));
    assert_eq!(never.outcome.unwrap().num_marriages, Some(0));
}

#[test]
fn wave3_lifetime_count_takes_precedence() {
    let raw = table(
        "wave3.tsv",
        &["CASENUM", "DOBY", "IDATYY", "SEX", "MS", "COH", "NUMCOHAB"],
        &[&["9", "80", "2002", "2", "5", "2", "3"]],
    );
    let adapter = bind_adapter(Wave::Wave3, raw.headers(), raw.name()).unwrap();
    let harmonized = adapter.adapt(
        &raw.record(0).unwrap(),
        &SentinelNormalizer::for_wave(Wave::Wave3),
    );
    assert!(!harmonized.notes.contains(&DerivationNote::CurrentCohabitationStatus));
    let record = harmonized.outcome.unwrap();
    assert_eq!(record.num_cohab_partners, Some(3));
    assert_eq!(record.ever_cohabited, Some(true));
}
