use std::fmt::Write as _;
use std::fs;

use nsfh_ingest::read_extract;
use nsfh_model::{Sex, Wave, WaveOptions};
use nsfh_report::tabulate;
use nsfh_transform::{WaveInputs, harmonize};
use tempfile::TempDir;

/// Appends `n` respondents of one age and sex, `partnered` of them partnered.
///
/// Partnered rows alternate between a marriage and cohabitation-only history;
/// every tenth unpartnered row carries the M95 missing code.
fn rows(out: &mut String, next_id: &mut usize, age: u32, sex: Sex, n: usize, partnered: usize) {
    let sex_code = match sex {
        Sex::Male => 1,
        Sex::Female => 2,
    };
    for i in 0..n {
        let (marriages, cohab) = if i < partnered {
            if i % 2 == 0 { ("1", "0") } else { ("0", "2") }
        } else if i % 10 == 0 {
            ("99", "0")
        } else {
            ("0", "0")
        };
        writeln!(out, "{next_id}\t{age}\t{sex_code}\t{marriages}\t{cohab}").unwrap();
        *next_id += 1;
    }
}

fn wave1_extract() -> String {
    let mut out = String::from("MCASEID\tM2BP01\tM2DP01\tM95\tNUMCOHAB\n");
    let mut id = 1;
    // Born 1954 at the 1987 reference year.
    rows(&mut out, &mut id, 33, Sex::Female, 1000, 926);
    rows(&mut out, &mut id, 33, Sex::Male, 1000, 921);
    // Born 1967.
    rows(&mut out, &mut id, 20, Sex::Male, 250, 79);
    rows(&mut out, &mut id, 20, Sex::Female, 200, 113);
    // Over 35 and not tabulated.
    rows(&mut out, &mut id, 50, Sex::Female, 40, 40);
    // No sex code, excluded before tabulation.
    writeln!(out, "{id}\t30\t\t1\t0").unwrap();
    out
}

#[test]
fn wave1_extract_reproduces_published_gaps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wave1.tsv");
    fs::write(&path, wave1_extract()).unwrap();

    let main = read_extract(&path).unwrap();
    assert_eq!(main.len(), 2491);
    let wave = harmonize(&WaveOptions::new(Wave::Wave1), WaveInputs::single(main)).unwrap();
    assert_eq!(wave.faults.identity_faults, 1);
    assert_eq!(wave.faults.included, 2490);

    let tables = tabulate(&wave, 200);
    assert_eq!(tables.present_cohorts(), vec!["1952–56", "1965–68"]);
    let sizes: Vec<(&str, Sex, usize)> = tables
        .primary_all
        .iter()
        .map(|cell| (cell.cohort.as_str(), cell.sex, cell.n))
        .collect();
    assert_eq!(
        sizes,
        vec![
            ("1952–56", Sex::Female, 1000),
            ("1952–56", Sex::Male, 1000),
            ("1965–68", Sex::Female, 200),
            ("1965–68", Sex::Male, 250),
        ]
    );

    let gaps = &tables.ever_partnered_gap;
    assert_eq!(gaps.len(), 2);
    assert_eq!(gaps[0].cohort, "1952–56");
    assert!((gaps[0].female.unwrap() - 0.926).abs() < 1e-9);
    assert!((gaps[0].male.unwrap() - 0.921).abs() < 1e-9);
    assert!((gaps[0].gap.unwrap() - 0.005).abs() < 1e-9);
    assert_eq!(gaps[1].cohort, "1965–68");
    assert!((gaps[1].female.unwrap() - 0.565).abs() < 1e-9);
    assert!((gaps[1].male.unwrap() - 0.316).abs() < 1e-9);
    assert!((gaps[1].gap.unwrap() - 0.249).abs() < 1e-9);

    // Half the partnered women married once, half only cohabited twice.
    let first = &tables.primary_all[0];
    assert!((first.mean_num_marriages_if_partnered.unwrap() - 0.5).abs() < 1e-9);
    assert!((first.mean_num_cohab_partners_if_partnered.unwrap() - 1.0).abs() < 1e-9);
    // Missing-code rows count toward n without being partnered.
    assert!(wave.faults.sentinel_values > 0);
}
