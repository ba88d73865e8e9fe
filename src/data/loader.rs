use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, RecordTable, Row, normalize_column_name};

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. A missing file is its own variant so
/// the UI can surface it distinctly and halt the render cycle.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("failed to read dataset: {0:#}")]
    Read(anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a student record table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (the usual source)
/// * `.json`    – `[{ "School": "...", "Grade": 7, ... }, ...]`
/// * `.parquet` – flat Arrow columns (strings, ints, floats, bools)
///
/// Column names are normalized exactly once, here; everything downstream
/// relies on the canonical names.
pub fn load_file(path: &Path) -> Result<RecordTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path).map_err(LoadError::Read),
        "json" => load_json(path).map_err(LoadError::Read),
        "parquet" | "pq" => load_parquet(path).map_err(LoadError::Read),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Dataset cache – memoize loads per source path
// ---------------------------------------------------------------------------

/// Loaded tables keyed by source path, so repeated renders with unchanged
/// filters never re-read the file. The key space is one fixed path per
/// session, so there is no eviction.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<RecordTable>>,
}

impl DatasetCache {
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<RecordTable>, LoadError> {
        if let Some(table) = self.entries.get(path) {
            log::debug!("dataset cache hit for {}", path.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load_file(path)?);
        log::info!(
            "loaded {} records with columns {:?} from {}",
            table.len(),
            table.columns,
            path.display()
        );
        self.entries.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with raw column names, one record per line.
/// Cell types are guessed per value: integer → float → bool → string,
/// empty cells become `Null`.
fn load_csv(path: &Path) -> Result<RecordTable> {
    let file = File::open(path).context("opening CSV")?;
    let mut reader = csv::Reader::from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(normalize_column_name)
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = Row::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = columns.get(col_idx) else {
                bail!("CSV row {row_no} has more cells than headers");
            };
            row.insert(col_name.clone(), guess_cell_type(value));
        }
        rows.push(row);
    }

    Ok(RecordTable::from_rows(columns, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "School": "Government", "Area": "Rural", "Grade": 7, "Dropout": "no" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RecordTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    // Column order: first appearance across records.
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Row::new();
        for (key, val) in obj {
            let col = normalize_column_name(key);
            if !columns.contains(&col) {
                columns.push(col.clone());
            }
            row.insert(col, json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RecordTable::from_rows(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat student records.
///
/// Expected schema: scalar columns only (Utf8, Int32/64, Float32/64, Bool).
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RecordTable> {
    let file = File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let batch_columns: Vec<String> = schema
            .fields()
            .iter()
            .map(|f| normalize_column_name(f.name()))
            .collect();
        if columns.is_empty() {
            columns = batch_columns.clone();
        }

        for row_idx in 0..batch.num_rows() {
            let mut row = Row::new();
            for (col_idx, col_name) in batch_columns.iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row_idx)
                    .with_context(|| format!("column '{col_name}', row {row_idx}"))?;
                row.insert(col_name.clone(), value);
            }
            rows.push(row);
        }
    }

    Ok(RecordTable::from_rows(columns, rows))
}

/// Extract a single scalar cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let s = if matches!(col.data_type(), DataType::Utf8) {
                col.as_string::<i32>().value(row).to_string()
            } else {
                col.as_string::<i64>().value(row).to_string()
            };
            CellValue::String(s)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        other => bail!("Unsupported parquet column type: {other:?}"),
    };
    Ok(value)
}
