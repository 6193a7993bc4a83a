use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt32Type, UInt64Type,
};
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::GameDataset;
use super::normalize::{normalize, NormalizeReport, RawGame, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize a game dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; `Date`, `Team`, `Opp`, `RS`, `RA`, `Result`, optional `PA`
/// * `.json`    – `[{ "Date": "...", "Team": "...", ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<(GameDataset, NormalizeReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!(LoadError::UnsupportedExtension(other.to_string())),
    };

    let (dataset, report) = normalize(table);
    log::info!(
        "Loaded {} games from {} ({} rows read)",
        dataset.len(),
        path.display(),
        report.rows_read
    );
    Ok((dataset, report))
}

// ---------------------------------------------------------------------------
// Column layout shared by every format
// ---------------------------------------------------------------------------

/// Positions of the modelled columns within a header row.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    date: usize,
    team: usize,
    opponent: usize,
    runs_scored: usize,
    runs_allowed: usize,
    result: usize,
    plate_appearances: Option<usize>,
    extra: Vec<(usize, String)>,
}

impl ColumnLayout {
    /// Locate the required columns. `PA` is optional; anything else is kept
    /// as an extra column.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.as_ref() == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        let date = find("Date")?;
        let team = find("Team")?;
        let opponent = find("Opp")?;
        let runs_scored = find("RS")?;
        let runs_allowed = find("RA")?;
        let result = find("Result")?;
        let plate_appearances = find("PA").ok();

        let modelled = [
            Some(date),
            Some(team),
            Some(opponent),
            Some(runs_scored),
            Some(runs_allowed),
            Some(result),
            plate_appearances,
        ];
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !modelled.contains(&Some(*i)))
            .map(|(i, h)| (i, h.as_ref().to_string()))
            .collect();

        Ok(ColumnLayout {
            date,
            team,
            opponent,
            runs_scored,
            runs_allowed,
            result,
            plate_appearances,
            extra,
        })
    }

    fn empty_table(&self) -> RawTable {
        RawTable {
            has_plate_appearances: self.plate_appearances.is_some(),
            extra_columns: self.extra.iter().map(|(_, name)| name.clone()).collect(),
            rows: Vec::new(),
        }
    }

    /// Assemble a raw row, reading each cell through `cell(column_index)`.
    fn raw_game(&self, cell: impl Fn(usize) -> String) -> RawGame {
        RawGame {
            date: cell(self.date),
            team: cell(self.team),
            opponent: cell(self.opponent),
            runs_scored: cell(self.runs_scored),
            runs_allowed: cell(self.runs_allowed),
            result: cell(self.result),
            plate_appearances: self.plate_appearances.map(&cell),
            extra: self.extra.iter().map(|(i, _)| cell(*i)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let layout = ColumnLayout::from_headers(&headers)?;
    let mut table = layout.empty_table();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        table
            .rows
            .push(layout.raw_game(|i| record.get(i).unwrap_or("").to_string()));
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-04-01", "Team": "SEA", "Opp": "BOS", "RS": 5, "RA": 2, "Result": "W 5-2" },
///   ...
/// ]
/// ```
///
/// A numeric `Date` is read as epoch milliseconds, which is how that export
/// writes datetime columns.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let Some(records) = root.as_array() else {
        bail!(LoadError::NotARecordArray);
    };

    let mut objects = Vec::with_capacity(records.len());
    let mut keys = BTreeSet::new();
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            bail!(LoadError::NotAnObject(i));
        };
        keys.extend(obj.keys().cloned());
        objects.push(obj);
    }

    let headers: Vec<String> = keys.into_iter().collect();
    let layout = ColumnLayout::from_headers(&headers)?;
    let mut table = layout.empty_table();

    for obj in objects {
        table.rows.push(layout.raw_game(|i| {
            let val = obj.get(&headers[i]);
            if i == layout.date {
                json_date_text(val)
            } else {
                json_cell_text(val)
            }
        }));
    }

    Ok(table)
}

fn json_cell_text(val: Option<&JsonValue>) -> String {
    match val {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn json_date_text(val: Option<&JsonValue>) -> String {
    match val.and_then(JsonValue::as_i64) {
        Some(millis) => {
            date_text(DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive()))
        }
        None => json_cell_text(val),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per source column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); dates may be stored as text, `Date32`,
/// `Date64` or a timestamp of any unit. Timestamps with a time zone are read
/// as their UTC calendar date.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let layout = ColumnLayout::from_headers(&headers)?;
    let mut table = layout.empty_table();

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            table
                .rows
                .push(layout.raw_game(|i| arrow_cell_text(batch.column(i), row)));
        }
    }

    Ok(table)
}

/// Render a single Arrow cell as the text a CSV export would contain.
fn arrow_cell_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::UInt32 => col.as_primitive::<UInt32Type>().value(row).to_string(),
        DataType::UInt64 => col.as_primitive::<UInt64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Boolean => col.as_boolean().value(row).to_string(),
        DataType::Date32 => date_text(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Date64 => date_text(col.as_primitive::<Date64Type>().value_as_date(row)),
        DataType::Timestamp(TimeUnit::Second, _) => {
            date_text(col.as_primitive::<TimestampSecondType>().value_as_date(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            date_text(col.as_primitive::<TimestampMillisecondType>().value_as_date(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            date_text(col.as_primitive::<TimestampMicrosecondType>().value_as_date(row))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            date_text(col.as_primitive::<TimestampNanosecondType>().value_as_date(row))
        }
        other => {
            log::debug!("rendering unsupported parquet type {other:?} as empty");
            String::new()
        }
    }
}

/// Temporal cells become ISO text so they go through the same date parser.
fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}
