use std::fs;

use nsfh_ingest::RawTable;
use nsfh_model::{Sex, Wave, WaveOptions};
use nsfh_report::{
    STACKED_SHEETS, build_stacked_tables, stacked_analytic_workbook, stacked_tables_workbook,
};
use nsfh_transform::{HarmonizedWave, WaveInputs, harmonize};
use tempfile::TempDir;

fn raw(name: &str, headers: &[&str], rows: &[[&str; 5]]) -> RawTable {
    RawTable::new(
        name,
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| (*v).to_string()).collect())
            .collect(),
    )
}

/// Born 1967 (cohort 1965–68) except one woman born 1954.
fn wave1() -> HarmonizedWave {
    let main = raw(
        "wave1.tsv",
        &["MCASEID", "M2BP01", "M2DP01", "M95", "NUMCOHAB"],
        &[
            ["1001", "20", "2", "1", "0"],
            ["1002", "20", "2", "0", "1"],
            ["1003", "20", "2", "0", "0"],
            ["1004", "20", "1", "1", "0"],
            ["1005", "20", "1", "0", "0"],
            ["1006", "20", "1", "0", "0"],
            ["1007", "33", "2", "1", "0"],
        ],
    );
    harmonize(&WaveOptions::new(Wave::Wave1), WaveInputs::single(main)).unwrap()
}

/// Born 1967 (cohort 1965–69) except one man born 1963.
fn wave2() -> HarmonizedWave {
    let headers = ["MCASEID", "MA8", "MA7", "MI41", "MI140", "MI40", "MI42"];
    let rows: Vec<Vec<String>> = [
        ["2001", "26", "2", "1", "0", "1", "2"],
        ["2002", "26", "2", "0", "0", "2", "2"],
        ["2003", "26", "1", "0", "1", "2", "1"],
        ["2004", "26", "1", "0", "1", "2", "1"],
        ["2005", "30", "1", "0", "0", "2", "2"],
    ]
    .iter()
    .map(|row| row.iter().map(|v| (*v).to_string()).collect())
    .collect();
    let main = RawTable::new(
        "wave2.tsv",
        headers.iter().map(|h| (*h).to_string()).collect(),
        rows,
    );
    harmonize(&WaveOptions::new(Wave::Wave2), WaveInputs::single(main)).unwrap()
}

fn read_sheet(path: &std::path::Path) -> (Vec<String>, Vec<Vec<String>>) {
    let contents = fs::read_to_string(path).unwrap();
    let mut lines = contents.lines();
    let header = lines
        .next()
        .unwrap()
        .split(',')
        .map(str::to_string)
        .collect();
    let rows = lines
        .map(|line| line.split(',').map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[test]
fn pooled_tables_follow_wave_then_bin_order() {
    let (first, second) = (wave1(), wave2());
    let tables = build_stacked_tables(&[&first, &second], 2);
    assert_eq!(tables.waves, vec![Wave::Wave1, Wave::Wave2]);

    let cells: Vec<(&str, Sex, usize)> = tables
        .pooled
        .primary_all
        .iter()
        .map(|cell| (cell.cohort.as_str(), cell.sex, cell.n))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("1952–56", Sex::Female, 1),
            ("1965–68", Sex::Female, 3),
            ("1965–68", Sex::Male, 3),
            ("1960–64", Sex::Male, 1),
            ("1965–69", Sex::Female, 2),
            ("1965–69", Sex::Male, 2),
        ]
    );
    assert_eq!(tables.pooled.present_cohorts(), vec!["1965–68", "1965–69"]);

    let gaps = &tables.pooled.ever_partnered_gap;
    assert_eq!(gaps.len(), 2);
    assert!((gaps[0].gap.unwrap() - 1.0 / 3.0).abs() < 1e-9);
    assert!((gaps[1].female.unwrap() - 0.5).abs() < 1e-9);
    assert!((gaps[1].male.unwrap() - 1.0).abs() < 1e-9);
    assert!((gaps[1].gap.unwrap() + 0.5).abs() < 1e-9);
}

#[test]
fn pooled_macro_cohorts_combine_waves() {
    let (first, second) = (wave1(), wave2());
    let tables = build_stacked_tables(&[&first, &second], 2);
    let cells: Vec<(&str, Sex, usize)> = tables
        .pooled
        .macro_all
        .iter()
        .map(|cell| (cell.cohort.as_str(), cell.sex, cell.n))
        .collect();
    assert_eq!(
        cells,
        vec![
            ("1950–59", Sex::Female, 1),
            ("1960–69", Sex::Female, 5),
            ("1960–69", Sex::Male, 6),
        ]
    );
    assert!((tables.pooled.macro_all[1].p_ever_partnered - 0.6).abs() < 1e-9);
    assert!((tables.pooled.macro_all[2].p_ever_partnered - 0.5).abs() < 1e-9);
}

#[test]
fn by_wave_tables_keep_each_wave_separate() {
    let (first, second) = (wave1(), wave2());
    let tables = build_stacked_tables(&[&first, &second], 2);
    assert_eq!(tables.by_wave.len(), 2);
    assert_eq!(tables.by_wave[0].wave, Wave::Wave1);
    assert_eq!(tables.by_wave[0].tables.present_cohorts(), vec!["1965–68"]);
    assert_eq!(tables.by_wave[1].wave, Wave::Wave2);
    assert_eq!(tables.by_wave[1].tables.present_cohorts(), vec!["1965–69"]);

    // A single wave pools to its own tables.
    let alone = build_stacked_tables(&[&first], 2);
    assert_eq!(alone.pooled, alone.by_wave[0].tables);
}

#[test]
fn no_waves_yield_empty_tables() {
    let tables = build_stacked_tables(&[], 200);
    assert!(tables.waves.is_empty());
    assert!(tables.pooled.primary_all.is_empty());
    assert!(tables.pooled.macro_all.is_empty());
    assert!(tables.by_wave.is_empty());
}

#[test]
fn stacked_workbooks_tag_rows_with_their_wave() {
    let (first, second) = (wave1(), wave2());
    let waves = [&first, &second];
    let tables = build_stacked_tables(&waves, 2);
    let dir = TempDir::new().unwrap();

    let written = stacked_tables_workbook(&tables)
        .unwrap()
        .write(dir.path())
        .unwrap();
    let names: Vec<&str> = written.iter().map(|sheet| sheet.sheet.as_str()).collect();
    assert_eq!(names, STACKED_SHEETS.to_vec());
    for sheet in STACKED_SHEETS {
        assert!(dir.path().join("tables").join(format!("{sheet}.csv")).is_file());
    }

    let (header, rows) = read_sheet(
        &dir.path()
            .join("tables")
            .join("stacked_ever_partnered_gap_by_wave.csv"),
    );
    assert_eq!(header[0], "wave");
    assert_eq!(header[1], "cohort_primary");
    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|row| (row[0].as_str(), row[1].as_str()))
        .collect();
    assert_eq!(keys, vec![("wave1", "1965–68"), ("wave2", "1965–69")]);

    let (header, rows) = read_sheet(
        &dir.path()
            .join("tables")
            .join("stacked_primary_all_by_wave.csv"),
    );
    assert_eq!(header[0], "wave");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows.iter().filter(|row| row[0] == "wave2").count(), 3);

    stacked_analytic_workbook(&waves)
        .unwrap()
        .write(dir.path())
        .unwrap();
    let (header, rows) = read_sheet(&dir.path().join("analytic").join("analytic.csv"));
    assert_eq!(rows.len(), 12);
    let column = |name: &str| header.iter().position(|h| h == name).unwrap();
    let wave1_row = rows
        .iter()
        .find(|row| row[column("respondent_id")] == "1001")
        .unwrap();
    assert_eq!(wave1_row[column("wave")], "wave1");
    assert_eq!(wave1_row[column("raw_M95")], "1");
    assert_eq!(wave1_row[column("raw_MI41")], "");
    let wave2_row = rows
        .iter()
        .find(|row| row[column("respondent_id")] == "2003")
        .unwrap();
    assert_eq!(wave2_row[column("wave")], "wave2");
    assert_eq!(wave2_row[column("raw_M95")], "");
    assert_eq!(wave2_row[column("ever_partnered")], "true");
}
