use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nsfh_model::{FaultSummary, GapRow};
use nsfh_cli::types::{StackedResult, WaveResult};

pub fn print_summary(result: &WaveResult) {
    let report = &result.report;
    println!("Wave: {} ({})", result.wave, result.wave.fielding_period());
    println!(
        "Reference interview year: {}",
        report.options.reference_interview_year
    );
    if report.dry_run {
        println!("Output: dry run, nothing written");
    } else {
        println!("Output: {}", result.wave_dir.display());
    }
    if let Some(path) = &result.report_path {
        println!("Run report: {}", path.display());
    }
    print_fault_table(&report.faults);
    print_gap_table(&result.tables.ever_partnered_gap, report.options.min_n);
}

pub fn print_stacked_summary(result: &StackedResult) {
    let waves: Vec<&str> = result.waves.iter().map(|wave| wave.key()).collect();
    println!("Stacked waves: {}", waves.join(", "));
    match &result.stacked_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: dry run, nothing written"),
    }
    print_gap_table(&result.tables.pooled.ever_partnered_gap, result.min_n);
}

fn print_fault_table(faults: &FaultSummary) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Respondents"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Respondent rows"),
        Cell::new(faults.respondents),
    ]);
    table.add_row(vec![
        Cell::new("Included").fg(Color::Green),
        Cell::new(faults.included).add_attribute(Attribute::Bold),
    ]);
    let rows = [
        ("Identity faults", Some(faults.identity_faults), Color::Yellow),
        ("Join faults", Some(faults.join_faults), Color::Red),
        (
            "Orphan roster keys",
            Some(faults.orphan_roster_keys),
            Color::Yellow,
        ),
        (
            "Cohort boundary faults",
            Some(faults.cohort_boundary_faults),
            Color::Yellow,
        ),
        ("Sentinel values", Some(faults.sentinel_values), Color::DarkGrey),
        (
            "Unparseable values",
            Some(faults.unparseable_values),
            Color::Yellow,
        ),
        ("Negative counts", Some(faults.negative_counts), Color::Yellow),
        (
            "Non-respondent rows",
            Some(faults.non_respondent_rows),
            Color::DarkGrey,
        ),
    ];
    for (label, count, color) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, color)]);
    }
    table.add_row(vec![
        Cell::new("EXCLUDED")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(faults.excluded()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn print_gap_table(rows: &[GapRow], min_n: usize) {
    if rows.is_empty() {
        println!("No cohort reaches N >= {min_n} for both sexes.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Cohort"),
        header_cell("Female"),
        header_cell("Male"),
        header_cell("Gap (pp)"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.cohort)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            percent_cell(row.female),
            percent_cell(row.male),
            gap_cell(row.gap),
        ]);
    }
    println!("{table}");
}

fn percent_cell(share: Option<f64>) -> Cell {
    match share {
        Some(value) => Cell::new(format!("{:.1}%", value * 100.0)),
        None => dim_cell("-"),
    }
}

fn gap_cell(gap: Option<f64>) -> Cell {
    match gap {
        Some(value) => Cell::new(format!("{:+.1}", value * 100.0)).add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
