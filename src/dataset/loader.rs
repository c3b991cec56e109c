//! CSV loading.

use crate::dataset::{Table, Value};
use crate::error::TrainError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Loads a CSV file with a header row into a [`Table`].
///
/// Records are read flexibly: a short record is kept as-is and only rejected
/// later if a projected column is missing from it.
///
/// # Errors
/// [`TrainError::DataLoad`] if the file is absent or unreadable, if the CSV is
/// malformed, if it is not valid UTF-8, or if it has no header row.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Table, TrainError> {
    let path = path.as_ref();
    let load_error = |reason: String| TrainError::DataLoad {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| load_error(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(load_error("file has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| load_error(e.to_string()))?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    debug!(
        path = %path.display(),
        columns = columns.len(),
        rows = rows.len(),
        "loaded dataset"
    );
    Ok(Table::new(columns, rows))
}
