pub mod cohort;
pub mod error;
pub mod fault;
pub mod options;
pub mod provenance;
pub mod record;
pub mod summary;
pub mod value;
pub mod wave;

pub use cohort::{BinSet, CohortBin};
pub use error::{ModelError, Result};
pub use fault::{FaultKind, FaultSummary, ReasonCode};
pub use options::{DEFAULT_MIN_N, WaveOptions};
pub use provenance::{AuditField, DerivationNote, ProvenanceRecord, RecordStatus, SourceRef};
pub use record::{AGE_CEILING, AnalyticRecord, CohortAssignment, PartnershipRecord, Sex};
pub use summary::{AggregateCell, GapRow, StackedTables, SummaryTables, WaveTables};
pub use value::{FieldValue, MissingReason};
pub use wave::Wave;
