pub mod columns;
pub mod csv_table;
pub mod digest;
pub mod error;
pub mod merge;
pub mod record;

pub use columns::{ColumnIndex, require_column, resolve_column};
pub use csv_table::{RawTable, detect_delimiter, read_extract, read_extract_with_delimiter};
pub use digest::{sha256_file, sha256_hex};
pub use error::{IngestError, Result};
pub use merge::{JoinFault, MergeOutcome, ROSTER_SUFFIX, merge_one_to_one, merged_headers};
pub use record::{RawRecord, RowView};
