use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{FieldValue, HouseholdDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a household table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one household per line (the usual export)
/// * `.json`    – `[{ "Household ID": 1, "State": "CA", ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// The schema contract is checked once here; a missing required column
/// surfaces as [`crate::ExplorerError::Schema`] inside the returned error.
pub fn load_file(path: &Path) -> Result<HouseholdDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} households ({} columns, {} states) from {}",
        dataset.len(),
        dataset.column_names.len(),
        dataset.states.len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<HouseholdDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV text with a header row. Cell types are guessed per cell.
pub fn read_csv<R: Read>(input: R) -> Result<HouseholdDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let fields: BTreeMap<String, FieldValue> = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_field_type(value)))
            .collect();
        rows.push(fields);
    }

    Ok(HouseholdDataset::new(headers, rows)?)
}

fn guess_field_type(s: &str) -> FieldValue {
    let s = s.trim();
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FieldValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => FieldValue::Bool(true),
        "false" | "False" | "FALSE" => FieldValue::Bool(false),
        _ => FieldValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<HouseholdDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
///
/// Column order is the order keys are first seen.
pub fn read_json(text: &str) -> Result<HouseholdDataset> {
    let records: Vec<Map<String, JsonValue>> =
        serde_json::from_str(text).context("Expected a top-level JSON array of objects")?;

    let mut column_names: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for obj in records {
        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            if !column_names.contains(&key) {
                column_names.push(key.clone());
            }
            fields.insert(key, json_to_field(&val));
        }
        rows.push(fields);
    }

    Ok(HouseholdDataset::new(column_names, rows)?)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat scalar column per household field.
fn load_parquet(path: &Path) -> Result<HouseholdDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let mut fields = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_field_value(batch.column(col_idx), row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", field.name()))?;
                fields.insert(field.name().clone(), value);
            }
            rows.push(fields);
        }
    }

    Ok(HouseholdDataset::new(column_names, rows)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_field_value(col: &ArrayRef, row: usize) -> Result<FieldValue> {
    if col.is_null(row) {
        return Ok(FieldValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => FieldValue::String(
            col.as_string_opt::<i32>()
                .context("expected StringArray")?
                .value(row)
                .to_string(),
        ),
        DataType::LargeUtf8 => FieldValue::String(
            col.as_string_opt::<i64>()
                .context("expected LargeStringArray")?
                .value(row)
                .to_string(),
        ),
        DataType::Int32 => FieldValue::Integer(i64::from(
            col.as_primitive_opt::<Int32Type>()
                .context("expected Int32Array")?
                .value(row),
        )),
        DataType::Int64 => FieldValue::Integer(
            col.as_primitive_opt::<Int64Type>()
                .context("expected Int64Array")?
                .value(row),
        ),
        DataType::Float32 => FieldValue::Float(f64::from(
            col.as_primitive_opt::<Float32Type>()
                .context("expected Float32Array")?
                .value(row),
        )),
        DataType::Float64 => FieldValue::Float(
            col.as_primitive_opt::<Float64Type>()
                .context("expected Float64Array")?
                .value(row),
        ),
        DataType::Boolean => FieldValue::Bool(
            col.as_boolean_opt()
                .context("expected BooleanArray")?
                .value(row),
        ),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::columns;
    use crate::ExplorerError;

    const HEADER: &str = "Household ID,State,Age of Head,Age of Spouse,Number of Dependents,Is Married,\
Baseline Federal Tax Liability,Baseline Net Income,Household Weight,\
Total Change in Federal Tax Liability,Total Change in Net Income";

    #[test]
    fn csv_cells_are_typed() {
        let text = format!("{HEADER}\n7,TX,51.0,,2,True,4200.5,81000,1500.25,-310,310\n");
        let ds = read_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.id(), 7);
        assert_eq!(rec.text(columns::STATE), Some("TX"));
        assert_eq!(rec.get(columns::AGE_OF_SPOUSE), Some(&FieldValue::Null));
        assert_eq!(rec.flag(columns::IS_MARRIED), Some(true));
        assert_eq!(rec.number(columns::BASELINE_NET_INCOME), Some(81_000.0));
        assert_eq!(ds.column_names.first().map(String::as_str), Some("Household ID"));
    }

    #[test]
    fn csv_missing_required_column_is_a_schema_error() {
        let text = "Household ID,State\n1,CA\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        match err.downcast_ref::<ExplorerError>() {
            Some(ExplorerError::Schema { missing }) => {
                assert_eq!(missing.len(), 8);
                assert!(missing.contains(&columns::HOUSEHOLD_WEIGHT.to_string()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn json_records_load() {
        let text = r#"[
            {"Household ID": 1, "State": "NY", "Age of Head": 30, "Number of Dependents": 0,
             "Is Married": false, "Baseline Federal Tax Liability": 1000.0,
             "Baseline Net Income": 40000, "Household Weight": 250.5,
             "Total Change in Federal Tax Liability": -20.0, "Total Change in Net Income": 20.0,
             "State Income Tax": null}
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert!(ds.column_names.iter().any(|c| c == "State Income Tax"));
        assert_eq!(ds.records[0].number_or("State Income Tax", 0.0), 0.0);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(read_json(r#"{"Household ID": 1}"#).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("households.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
