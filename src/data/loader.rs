use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::array_value_to_string;
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::{PlotError, Result};

use super::model::{Cell, RawDataset};

/// Extensions accepted by [`load_file`], lower case, without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "csv", "txt", "xlsx", "xlsm", "xls", "xlsb", "ods", "parquet", "pq", "json",
];

enum SourceFormat {
    Delimited,
    Workbook,
    Parquet,
    Json,
}

fn source_format(path: &Path) -> Result<SourceFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => Ok(SourceFormat::Delimited),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(SourceFormat::Workbook),
        "parquet" | "pq" => Ok(SourceFormat::Parquet),
        "json" => Ok(SourceFormat::Json),
        other => Err(PlotError::UnsupportedFileFormat(other.to_string())),
    }
}

/// Whether `path` has an extension [`load_file`] understands.
pub fn is_supported(path: &Path) -> bool {
    source_format(path).is_ok()
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt`  – comma-delimited text, ragged rows allowed
/// * `.xlsx` / `.xls` / `.ods` … – first sheet of a workbook
/// * `.parquet`       – flat table, schema names become the header row
/// * `.json`          – `[{ "asciitime": "...", "Temp": 1.5, ... }, ...]`
///
/// The extension is checked before the file is touched.
pub fn load_file(path: &Path) -> Result<RawDataset> {
    let dataset = match source_format(path)? {
        SourceFormat::Delimited => load_delimited(path)?,
        SourceFormat::Workbook => load_sheets(path, false)?
            .into_iter()
            .next()
            .ok_or_else(|| PlotError::EmptyWorkbook(path.display().to_string()))?,
        SourceFormat::Parquet => load_parquet(path)?,
        SourceFormat::Json => load_json(path)?,
    };
    log::debug!(
        "{}: {} rows x {} columns",
        dataset.name,
        dataset.row_count(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Like [`load_file`], but a workbook yields one dataset per non-empty sheet,
/// named `file:sheet` when there is more than one.
pub fn load_all_sheets(path: &Path) -> Result<Vec<RawDataset>> {
    match source_format(path)? {
        SourceFormat::Workbook => load_sheets(path, true),
        _ => Ok(vec![load_file(path)?]),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row, units row, then one sample per line. Lines may have fewer
/// fields than the header.
fn load_delimited(path: &Path) -> Result<RawDataset> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let classify: fn(&str) -> Cell = if i == 0 { Cell::name } else { Cell::from_text };
        rows.push(record.iter().map(classify).collect());
    }

    Ok(RawDataset::new(dataset_name(path), rows))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn load_sheets(path: &Path, all: bool) -> Result<Vec<RawDataset>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names();
    if names.is_empty() {
        return Err(PlotError::EmptyWorkbook(path.display().to_string()));
    }

    let stem = dataset_name(path);
    let wanted = if all { &names[..] } else { &names[..1] };
    let qualify = wanted.len() > 1;

    let mut datasets = Vec::with_capacity(wanted.len());
    for sheet in wanted {
        let range = workbook.worksheet_range(sheet)?;
        if all && range.is_empty() {
            log::debug!("{stem}: skipping empty sheet '{sheet}'");
            continue;
        }
        let rows = range
            .rows()
            .enumerate()
            .map(|(i, row)| match i {
                0 => row.iter().map(workbook_header_cell).collect(),
                _ => row.iter().map(workbook_cell).collect(),
            })
            .collect();
        let name = if qualify {
            format!("{stem}:{sheet}")
        } else {
            stem.clone()
        };
        datasets.push(RawDataset::new(name, rows));
    }
    Ok(datasets)
}

/// Header cells are names whatever type the sheet stored them as.
fn workbook_header_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::name(s),
        other => Cell::name(&other.to_string()),
    }
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Field names form the header; Parquet has no
/// units row, so an empty one is inserted to keep the grid layout uniform.
fn load_parquet(path: &Path) -> Result<RawDataset> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let header: Vec<Cell> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Cell::name(f.name()))
        .collect();
    let reader = builder.build()?;

    let mut rows = vec![header, Vec::new()];
    for batch in reader {
        let batch = batch?;
        let columns = batch
            .columns()
            .iter()
            .map(column_cells)
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawDataset::new(dataset_name(path), rows))
}

/// Convert one Arrow column to cells. Numeric types go through a Float64
/// cast, everything else through Arrow's display formatting.
fn column_cells(col: &ArrayRef) -> Result<Vec<Cell>> {
    let n = col.len();

    if col.data_type().is_numeric() {
        let values = cast(col, &DataType::Float64)?;
        let values = values.as_primitive::<Float64Type>();
        return Ok((0..n)
            .map(|i| {
                if values.is_null(i) {
                    Cell::Empty
                } else {
                    Cell::Number(values.value(i))
                }
            })
            .collect());
    }

    if let DataType::Boolean = col.data_type() {
        let values = col.as_boolean();
        return Ok((0..n)
            .map(|i| match values.is_null(i) {
                true => Cell::Empty,
                false => Cell::Number(if values.value(i) { 1.0 } else { 0.0 }),
            })
            .collect());
    }

    (0..n)
        .map(|i| {
            if col.is_null(i) {
                Ok(Cell::Empty)
            } else {
                Ok(Cell::from_text(&array_value_to_string(col.as_ref(), i)?))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "asciitime": "Mon Jan 02 03:04:05 2012", "Temp": 21.5 },
///   { "asciitime": "Mon Jan 02 03:04:06 2012", "Temp": 21.7 }
/// ]
/// ```
///
/// The header is the union of all records' keys, in the order they first
/// appear; the units row is empty. A key missing from a record reads as a
/// blank cell.
fn load_json(path: &Path) -> Result<RawDataset> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let malformed = |reason: String| PlotError::MalformedFile {
        path: path.display().to_string(),
        reason,
    };

    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected a top-level JSON array".into()))?;

    let mut objects = Vec::with_capacity(records.len());
    let mut header: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| malformed(format!("record {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let mut rows = Vec::with_capacity(objects.len() + 2);
    rows.push(header.iter().map(|h| Cell::name(h)).collect());
    rows.push(Vec::new());
    for obj in objects {
        rows.push(
            header
                .iter()
                .map(|key| obj.get(key).map(json_cell).unwrap_or(Cell::Empty))
                .collect(),
        );
    }

    Ok(RawDataset::new(dataset_name(path), rows))
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Empty,
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) if s.trim().is_empty() => Cell::Empty,
        JsonValue::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}
