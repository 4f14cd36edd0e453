//! CSV table reader with full input validation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sylva_id3::{Category, Dataset};
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads a categorical table from a CSV file.
///
/// Expected CSV format:
/// - Header row required, column names unique
/// - One row per sample, all rows with the same number of columns
/// - No empty cells
///
/// Cells are trimmed. A cell that parses as a finite number is stored in its
/// shortest canonical form, so `5.10`, `5.1` and `05.1` are one category and
/// `5.0` equals `5`. Any other text is kept verbatim.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::EmptyFile`] | File has no header line |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::DuplicateColumn`] | Two header columns share a name |
/// | [`IoError::UnknownColumn`] | A column to drop is not in the header |
/// | [`IoError::EmptyDataset`] | Zero data rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::MissingValue`] | A cell is empty |
pub struct TableReader {
    path: PathBuf,
    dropped: Vec<String>,
}

impl TableReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            dropped: Vec::new(),
        }
    }

    /// Remove the named columns from the loaded table.
    #[must_use]
    pub fn with_dropped_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dropped = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Read and validate the CSV file, returning a [`Dataset`].
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) lets InconsistentRowLength fire instead of a CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.parse_error(e))?.clone();
        if header.is_empty() {
            return Err(IoError::EmptyFile {
                path: self.path.clone(),
            });
        }
        let expected_cols = header.len();
        debug!(expected_cols, "read CSV header");

        let mut seen = HashSet::new();
        for name in &header {
            if !seen.insert(name) {
                return Err(IoError::DuplicateColumn {
                    path: self.path.clone(),
                    name: name.to_string(),
                });
            }
        }

        let mut keep = vec![true; expected_cols];
        for name in &self.dropped {
            let col = header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| IoError::UnknownColumn {
                    path: self.path.clone(),
                    name: name.clone(),
                })?;
            keep[col] = false;
        }

        let columns: Vec<String> = header
            .iter()
            .zip(&keep)
            .filter(|&(_, &k)| k)
            .map(|(h, _)| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.parse_error(e))?;

            if record.len() != expected_cols {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: expected_cols,
                    got: record.len(),
                });
            }

            let mut row = Vec::with_capacity(columns.len());
            for (col, raw) in record.iter().enumerate() {
                if raw.is_empty() {
                    return Err(IoError::MissingValue {
                        path: self.path.clone(),
                        row_index,
                        column: header[col].to_string(),
                    });
                }
                if keep[col] {
                    row.push(canonical(raw));
                }
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let dataset = Dataset::new(columns, rows)?;
        info!(
            n_rows = dataset.n_rows(),
            n_columns = dataset.n_columns(),
            n_dropped = self.dropped.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    fn parse_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

/// Canonical category for a raw cell.
fn canonical(raw: &str) -> Category {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Category::new(value.to_string()),
        _ => Category::from(raw),
    }
}
