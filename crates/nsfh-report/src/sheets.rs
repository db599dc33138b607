//! Named sheets and their CSV files.
//!
//! A workbook is a directory; each sheet is a CSV file named after it.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{Column, CsvWriter, DataFrame, IntoColumn, PolarsResult, SerWriter, Series};
use serde::Serialize;
use tracing::debug;

use crate::error::{ReportError, Result};

/// Decimal places written for floating-point columns.
pub const FLOAT_PRECISION: usize = 6;

/// A named table.
#[derive(Debug, Clone)]
pub struct SheetFrame {
    pub name: String,
    pub data: DataFrame,
}

impl SheetFrame {
    pub fn new(name: impl Into<String>, data: DataFrame) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.height()
    }
}

/// Where a sheet was written and how many rows it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenSheet {
    pub workbook: String,
    pub sheet: String,
    pub rows: usize,
    pub path: PathBuf,
}

/// An ordered set of sheets written under one directory.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub name: String,
    pub sheets: Vec<SheetFrame>,
}

impl Workbook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sheet(mut self, sheet: SheetFrame) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetFrame> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Writes every sheet to `<dir>/<workbook>/<sheet>.csv`.
    pub fn write(&self, dir: &Path) -> Result<Vec<WrittenSheet>> {
        let root = dir.join(&self.name);
        fs::create_dir_all(&root).map_err(|source| ReportError::Io {
            path: root.clone(),
            source,
        })?;
        let mut written = Vec::with_capacity(self.sheets.len());
        for sheet in &self.sheets {
            let path = root.join(format!("{}.csv", sheet.name));
            write_csv(&sheet.name, &sheet.data, &path)?;
            debug!(
                workbook = %self.name,
                sheet = %sheet.name,
                rows = sheet.rows(),
                path = %path.display(),
                "sheet written"
            );
            written.push(WrittenSheet {
                workbook: self.name.clone(),
                sheet: sheet.name.clone(),
                rows: sheet.rows(),
                path,
            });
        }
        Ok(written)
    }
}

fn write_csv(sheet: &str, data: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut data = data.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_float_precision(Some(FLOAT_PRECISION))
        .finish(&mut data)
        .map_err(|source| ReportError::Frame {
            sheet: sheet.to_string(),
            source,
        })
}

/// Builds a frame from named series, mapping polars errors to the sheet.
pub(crate) fn frame(sheet: &str, series: Vec<Series>) -> Result<DataFrame> {
    let columns: Vec<Column> = series.into_iter().map(IntoColumn::into_column).collect();
    let built: PolarsResult<DataFrame> = DataFrame::new(columns);
    built.map_err(|source| ReportError::Frame {
        sheet: sheet.to_string(),
        source,
    })
}
