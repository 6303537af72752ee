use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, ColumnValues, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a header row naming the columns
/// * `.json`    – records-oriented array `[{ "col": value, ... }, ...]`
/// * `.parquet` – Parquet file (written by Pandas or Polars)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column dtype is inferred from the raw cells:
/// * every non-empty cell parses as a float → numeric (empty cells → NaN)
/// * every non-empty cell is `true`/`false` → boolean → unsupported
/// * anything else → categorical (empty cells → missing)
fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader. Split out so tests can feed in-memory bytes.
pub fn read_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| infer_column(name, &cells))
        .collect();

    Ok(Dataset::new(columns))
}

/// Infer a column's semantic type from its raw text cells.
fn infer_column(name: String, cells: &[String]) -> Column {
    let non_empty: Vec<&String> = cells.iter().filter(|c| !c.is_empty()).collect();

    let all_numeric =
        !non_empty.is_empty() && non_empty.iter().all(|c| c.parse::<f64>().is_ok());
    if all_numeric {
        let values = cells
            .iter()
            .map(|c| c.parse::<f64>().unwrap_or(f64::NAN))
            .collect();
        return Column {
            name,
            values: ColumnValues::Numeric(values),
        };
    }

    // Pure boolean columns mirror a bool dtype, which pandas keeps out of
    // both "number" and "object".
    let all_bool = !non_empty.is_empty() && non_empty.iter().all(|c| *c == "true" || *c == "false");
    if all_bool {
        return Column {
            name,
            values: ColumnValues::Unsupported,
        };
    }

    let values = cells
        .iter()
        .map(|c| if c.is_empty() { None } else { Some(c.clone()) })
        .collect();
    Column {
        name,
        values: ColumnValues::Categorical(values),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 25, "city": "NY" },
///   { "age": 30, "city": "LA" }
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_records(&text)
}

pub fn parse_json_records(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    // Column order: first appearance across the records.
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells: Vec<&JsonValue> = records
                .iter()
                .map(|rec| rec.get(&name).unwrap_or(&JsonValue::Null))
                .collect();
            json_column(name, &cells)
        })
        .collect();

    Ok(Dataset::new(columns))
}

/// Map a JSON column to a semantic type: all numbers (nulls allowed) →
/// numeric, any nested value or boolean → unsupported, otherwise
/// categorical with numbers rendered as text (a mixed column is an object
/// column in pandas terms).
fn json_column(name: String, cells: &[&JsonValue]) -> Column {
    let non_null: Vec<&&JsonValue> = cells.iter().filter(|v| !v.is_null()).collect();

    if non_null.iter().any(|v| v.is_boolean() || v.is_array() || v.is_object()) {
        return Column {
            name,
            values: ColumnValues::Unsupported,
        };
    }

    let all_numeric = !non_null.is_empty() && non_null.iter().all(|v| v.is_number());
    if all_numeric {
        let values = cells
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect();
        return Column {
            name,
            values: ColumnValues::Numeric(values),
        };
    }

    let values = cells
        .iter()
        .map(|v| match v {
            JsonValue::Null => None,
            JsonValue::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect();
    Column {
        name,
        values: ColumnValues::Categorical(values),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Arrow dtypes map directly onto semantic types:
/// Int32/Int64/Float32/Float64 → numeric, Utf8/LargeUtf8 → categorical,
/// everything else (booleans, dates, lists, ...) → unsupported.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        if columns.is_empty() {
            columns = schema
                .fields()
                .iter()
                .map(|f| Column {
                    name: f.name().clone(),
                    values: match f.data_type() {
                        DataType::Int32
                        | DataType::Int64
                        | DataType::Float32
                        | DataType::Float64 => ColumnValues::Numeric(Vec::new()),
                        DataType::Utf8 | DataType::LargeUtf8 => {
                            ColumnValues::Categorical(Vec::new())
                        }
                        _ => ColumnValues::Unsupported,
                    },
                })
                .collect();
        }

        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            match &mut column.values {
                ColumnValues::Numeric(values) => {
                    append_numeric(values, array)
                        .with_context(|| format!("column '{}'", column.name))?;
                }
                ColumnValues::Categorical(values) => {
                    append_strings(values, array)
                        .with_context(|| format!("column '{}'", column.name))?;
                }
                ColumnValues::Unsupported => {}
            }
        }
    }

    Ok(Dataset::new(columns))
}

// -- Arrow helpers --

/// Append an Arrow numeric column to `values`, widening to f64. Nulls
/// become NaN.
fn append_numeric(values: &mut Vec<f64>, array: &Arc<dyn Array>) -> Result<()> {
    match array.data_type() {
        DataType::Float64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            values.extend(arr.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
        DataType::Float32 => {
            let arr = array
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            values.extend(arr.iter().map(|v| v.map(f64::from).unwrap_or(f64::NAN)));
        }
        DataType::Int64 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            values.extend(arr.iter().map(|v| v.map(|i| i as f64).unwrap_or(f64::NAN)));
        }
        DataType::Int32 => {
            let arr = array
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            values.extend(arr.iter().map(|v| v.map(f64::from).unwrap_or(f64::NAN)));
        }
        other => bail!("Expected a numeric column, got {other:?}"),
    }
    Ok(())
}

/// Append an Arrow string column to `values`. Nulls become missing cells.
fn append_strings(values: &mut Vec<Option<String>>, array: &Arc<dyn Array>) -> Result<()> {
    match array.data_type() {
        DataType::Utf8 => {
            let arr = array
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            values.extend(arr.iter().map(|v| v.map(str::to_string)));
        }
        DataType::LargeUtf8 => {
            let arr = array.as_string::<i64>();
            values.extend(arr.iter().map(|v| v.map(str::to_string)));
        }
        other => bail!("Expected a string column, got {other:?}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::classify;
    use crate::data::model::SemanticType;
    use std::io::Cursor;

    fn csv_dataset(text: &str) -> Dataset {
        read_csv(csv::Reader::from_reader(Cursor::new(text))).unwrap()
    }

    #[test]
    fn csv_infers_numeric_and_categorical() {
        let ds = csv_dataset("age,city\n25,NY\n30,LA\n,NY\n");
        let cat = classify(&ds);
        assert_eq!(cat.numeric, vec!["age"]);
        assert_eq!(cat.categorical, vec!["city"]);

        let age = ds.numeric("age").unwrap();
        assert_eq!(age[0], 25.0);
        assert!(age[2].is_nan());
        let city = ds.categorical("city").unwrap();
        assert_eq!(city[0].as_deref(), Some("NY"));
    }

    #[test]
    fn csv_mixed_column_is_categorical() {
        let ds = csv_dataset("v\n1\nx\n2\n");
        assert_eq!(
            ds.column("v").unwrap().semantic_type(),
            SemanticType::Categorical
        );
    }

    #[test]
    fn csv_boolean_column_is_ignored() {
        let ds = csv_dataset("flag,n\ntrue,1\nfalse,2\n");
        let cat = classify(&ds);
        assert_eq!(cat.ignored, vec!["flag"]);
        assert_eq!(cat.numeric, vec!["n"]);
        assert!(cat.categorical.is_empty());
    }

    #[test]
    fn csv_all_empty_column_is_categorical() {
        let ds = csv_dataset("a,b\n1,\n2,\n");
        // No evidence of numbers, so the empty column stays categorical
        // with every cell missing.
        let b = ds.categorical("b").unwrap();
        assert!(b.iter().all(Option::is_none));
    }

    #[test]
    fn csv_row_count() {
        let ds = csv_dataset("x\n1\n2\n3\n");
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
    }

    #[test]
    fn json_records_preserve_column_order() {
        let ds = parse_json_records(
            r#"[
                {"age": 25, "city": "NY", "active": true},
                {"age": 30.5, "city": null, "active": false}
            ]"#,
        )
        .unwrap();
        let names: Vec<&str> = ds.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["age", "city", "active"]);

        let cat = classify(&ds);
        assert_eq!(cat.numeric, vec!["age"]);
        assert_eq!(cat.categorical, vec!["city"]);
        assert_eq!(cat.ignored, vec!["active"]);

        let city = ds.categorical("city").unwrap();
        assert_eq!(city[1], None);
    }

    #[test]
    fn json_missing_keys_become_missing_cells() {
        let ds = parse_json_records(r#"[{"a": 1}, {"a": 2, "b": "x"}]"#).unwrap();
        assert_eq!(ds.len(), 2);
        let b = ds.categorical("b").unwrap();
        assert_eq!(b[0], None);
        assert_eq!(b[1].as_deref(), Some("x"));
    }

    #[test]
    fn json_rejects_non_array_root() {
        assert!(parse_json_records(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_file(Path::new("data.xlsx")).is_err());
    }
}
