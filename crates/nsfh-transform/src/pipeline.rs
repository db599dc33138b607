//! Wave harmonization pipeline.
//!
//! Turns one wave's raw extracts into provenance records with analytic
//! records attached, the resolved bin sets, and the fault counters. Stages:
//! respondent filter, roster merge (Wave 3), field adaptation, primary bin
//! resolution, cohort assignment.

use std::time::Instant;

use nsfh_ingest::{
    ROSTER_SUFFIX, RawRecord, RawTable, merge_one_to_one, require_column, resolve_column,
};
use nsfh_model::{
    AnalyticRecord, AuditField, BinSet, DerivationNote, FaultKind, FaultSummary, FieldValue,
    MissingReason, ProvenanceRecord, RecordStatus, ReasonCode, Wave, WaveOptions,
};
use tracing::{debug, info, info_span, warn};

use crate::adapters::{Harmonized, MERGE_KEY_CANDIDATES, WaveAdapter, bind_adapter};
use crate::cohort::{BinningPolicy, CohortAssigner, birth_year, macro_bins};
use crate::error::{Result, TransformError};
use crate::normalization::SentinelNormalizer;

const TYPE_COLUMN: &str = "TYPE";
const MAIN_RESPONDENT: &str = "R";

/// Raw extracts for one wave.
#[derive(Debug, Clone)]
pub struct WaveInputs {
    pub main: RawTable,
    pub roster: Option<RawTable>,
}

impl WaveInputs {
    pub fn single(main: RawTable) -> Self {
        Self { main, roster: None }
    }

    pub fn with_roster(main: RawTable, roster: RawTable) -> Self {
        Self {
            main,
            roster: Some(roster),
        }
    }
}

/// Harmonized respondents of one wave.
#[derive(Debug, Clone)]
pub struct HarmonizedWave {
    pub wave: Wave,
    /// One entry per respondent row, in extract order.
    pub provenance: Vec<ProvenanceRecord>,
    pub primary_bins: BinSet,
    pub macro_bins: BinSet,
    pub faults: FaultSummary,
    /// Canonical raw field names audited for every respondent.
    pub audit_fields: Vec<String>,
}

impl HarmonizedWave {
    /// Analytic records of respondents with known sex and age.
    pub fn analytic(&self) -> impl Iterator<Item = &AnalyticRecord> + '_ {
        self.provenance
            .iter()
            .filter_map(|entry| entry.record.as_ref())
    }
}

/// An adapted respondent, with the join fault that excluded it if any.
struct Adapted {
    harmonized: Harmonized,
    join_fault: Option<ReasonCode>,
}

/// Drops non-respondent rows of the Wave 3 main extract.
fn keep_main_respondents(main: &mut RawTable) -> usize {
    let Some(column) = resolve_column(main.headers(), &[TYPE_COLUMN]) else {
        return 0;
    };
    main.retain_rows(&column, |value| value.trim() == MAIN_RESPONDENT)
}

/// Counts the missing-value faults of an analytic respondent's fields.
fn tally_missing(faults: &mut FaultSummary, audit: &[AuditField]) {
    for field in audit {
        match field.value {
            FieldValue::Missing(MissingReason::Sentinel(_)) => faults.sentinel_values += 1,
            FieldValue::Missing(MissingReason::Unparseable) => faults.unparseable_values += 1,
            FieldValue::Missing(MissingReason::Negative(_)) => faults.negative_counts += 1,
            _ => {}
        }
    }
}

fn adapt_all<'a>(
    adapter: &dyn WaveAdapter,
    sentinels: &SentinelNormalizer,
    records: impl IntoIterator<Item = RawRecord<'a>>,
) -> Vec<Adapted> {
    records
        .into_iter()
        .map(|record| Adapted {
            harmonized: adapter.adapt(&record, sentinels),
            join_fault: None,
        })
        .collect()
}

/// Harmonizes one wave.
///
/// Run-level faults (missing required columns, missing roster, invalid bin
/// configuration) are errors; respondent-level faults are recorded in the
/// provenance and counted in the fault summary.
pub fn harmonize(options: &WaveOptions, inputs: WaveInputs) -> Result<HarmonizedWave> {
    let wave = options.wave;
    let span = info_span!("harmonize", wave = %wave);
    let _guard = span.enter();
    let start = Instant::now();

    let WaveInputs { mut main, roster } = inputs;
    let sentinels = SentinelNormalizer::for_wave(wave);
    let mut faults = FaultSummary::default();

    let (adapted, audit_fields) = match (wave.requires_roster(), roster.as_ref()) {
        (true, None) => return Err(TransformError::MissingRoster { wave }),
        (false, Some(_)) => return Err(TransformError::UnexpectedRoster { wave }),
        (true, Some(roster)) => {
            faults.non_respondent_rows = keep_main_respondents(&mut main);
            let main_key =
                require_column(main.headers(), "CASENUM", MERGE_KEY_CANDIDATES, main.name())?;
            let roster_key = require_column(
                roster.headers(),
                "CASENUM",
                MERGE_KEY_CANDIDATES,
                roster.name(),
            )?;
            let outcome = merge_one_to_one(&main, &main_key, roster, &roster_key, ROSTER_SUFFIX);
            let adapter = bind_adapter(wave, &outcome.headers, main.name())?;
            faults.join_faults = outcome.fault_count();
            faults.orphan_roster_keys = outcome.orphan_keys.len();
            if outcome.fault_count() > 0 {
                warn!(
                    join_faults = outcome.fault_count(),
                    "respondent keys without a one-to-one roster match"
                );
            }

            let mut adapted = adapt_all(adapter.as_ref(), &sentinels, outcome.merged);
            for fault in outcome.faults {
                let reason = fault.reason();
                for record in fault.main_records {
                    adapted.push(Adapted {
                        harmonized: adapter.adapt(&record, &sentinels),
                        join_fault: Some(reason),
                    });
                }
            }
            // Restore extract order.
            adapted.sort_by_key(|entry| entry.harmonized.source.record);
            (adapted, adapter.audit_fields())
        }
        (false, None) => {
            let adapter = bind_adapter(wave, main.headers(), main.name())?;
            (
                adapt_all(adapter.as_ref(), &sentinels, main.records()),
                adapter.audit_fields(),
            )
        }
    };
    debug!(
        respondents = adapted.len(),
        duration_ms = start.elapsed().as_millis(),
        "fields adapted"
    );

    let observed: Vec<i32> = adapted
        .iter()
        .filter(|entry| entry.join_fault.is_none())
        .filter_map(|entry| entry.harmonized.outcome.as_ref().ok())
        .filter(|record| record.age_le_35())
        .map(|record| birth_year(options.reference_interview_year, record.age))
        .collect();
    let primary = BinningPolicy::primary_for(wave)?.resolve(&observed)?;
    let assigner = CohortAssigner::new(options.reference_interview_year, primary, macro_bins()?);
    debug!(
        bins = assigner.primary().len(),
        observed = observed.len(),
        "primary bins resolved"
    );

    let mut provenance = Vec::with_capacity(adapted.len());
    for Adapted {
        harmonized,
        join_fault,
    } in adapted
    {
        let Harmonized {
            respondent_id,
            source,
            audit,
            mut notes,
            outcome,
        } = harmonized;
        let (status, record) = match (join_fault, outcome) {
            (Some(reason), _) | (None, Err(reason)) => (RecordStatus::Excluded(reason), None),
            (None, Ok(partnership)) => {
                let assignment = assigner.assign(partnership.age);
                if assignment.cohort_primary.is_none() && partnership.age_le_35() {
                    faults.cohort_boundary_faults += 1;
                    notes.push(DerivationNote::CohortOutOfRange);
                }
                tally_missing(&mut faults, &audit);
                (
                    RecordStatus::Included,
                    Some(AnalyticRecord::from_parts(partnership, assignment)),
                )
            }
        };
        match status {
            RecordStatus::Included => faults.included += 1,
            RecordStatus::Excluded(reason) if reason.kind() == FaultKind::Identity => {
                faults.identity_faults += 1;
            }
            RecordStatus::Excluded(_) => {}
        }
        provenance.push(ProvenanceRecord {
            wave,
            respondent_id,
            source,
            status,
            record,
            notes,
            audit,
        });
    }
    faults.respondents = provenance.len();

    if faults.identity_faults > 0 {
        warn!(
            identity_faults = faults.identity_faults,
            "respondents excluded for missing sex or age"
        );
    }
    info!(
        respondents = faults.respondents,
        included = faults.included,
        excluded = faults.excluded(),
        duration_ms = start.elapsed().as_millis(),
        "wave harmonized"
    );

    Ok(HarmonizedWave {
        wave,
        provenance,
        primary_bins: assigner.primary().clone(),
        macro_bins: assigner.macro_bins().clone(),
        faults,
        audit_fields: audit_fields.iter().map(|field| (*field).to_string()).collect(),
    })
}
