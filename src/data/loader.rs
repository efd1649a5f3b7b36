use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Column, Point, Table};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// What to do with a column that contains text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NonNumericPolicy {
    /// Fail with [`LoadError::NonNumeric`].
    #[default]
    Reject,
    /// Leave the column out of the table.
    DropColumn,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub non_numeric: NonNumericPolicy,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, then one numeric value per field
/// * `.json`    – `{ "x": [...], "y1": [...] }` or `[{ "x": .., "y1": .. }, ...]`
/// * `.parquet` – flat Float64 / Float32 / Int64 / Int32 columns
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    load_file_with(path, LoadOptions::default())
}

pub fn load_file_with(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, options),
        "json" => load_json(path, options),
        "parquet" | "pq" => load_parquet(path, options),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }?;

    log::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// A test point row before missing cells are checked.
#[derive(Deserialize)]
struct RawPoint {
    x: Option<f64>,
    y: Option<f64>,
}

/// Read test points from a CSV file with `x` and `y` columns.
///
/// Empty cells and non-finite values fail with [`LoadError::MissingValue`].
pub fn load_points(path: &Path) -> Result<Vec<Point>, LoadError> {
    let raw: Vec<RawPoint> = read_records(path)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, p)| {
            // header is line 1
            let row = index as u64 + 2;
            let missing = |column: &str| LoadError::MissingValue {
                row,
                column: column.to_string(),
            };
            let x = p.x.filter(|v| v.is_finite()).ok_or_else(|| missing("x"))?;
            let y = p.y.filter(|v| v.is_finite()).ok_or_else(|| missing("y"))?;
            Ok(Point { x, y })
        })
        .collect()
}

/// Deserialize every row of a CSV file into `T` by header name.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let mut reader = csv_reader(path)?;
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(LoadError::MalformedRow {
                row: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record.deserialize(Some(&headers))?);
    }
    Ok(records)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::MissingFile(path.to_path_buf()),
        _ => LoadError::Io(e),
    })
}

fn csv_reader(path: &Path) -> Result<csv::Reader<BufReader<File>>, LoadError> {
    let file = open(path)?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file)))
}

// ---------------------------------------------------------------------------
// Cell classification shared by all formats
// ---------------------------------------------------------------------------

enum Cell {
    Number(f64),
    Missing { row: u64 },
    Text { row: u64, value: String },
}

impl Cell {
    fn parse(s: &str, row: u64) -> Self {
        if s.is_empty() {
            return Cell::Missing { row };
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            Ok(_) => Cell::Missing { row },
            Err(_) => Cell::Text {
                row,
                value: s.to_string(),
            },
        }
    }

    fn from_json(v: &JsonValue, row: u64) -> Self {
        match v {
            JsonValue::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Cell::Number(f),
                _ => Cell::Text {
                    row,
                    value: n.to_string(),
                },
            },
            JsonValue::Null => Cell::Missing { row },
            other => Cell::Text {
                row,
                value: other.to_string(),
            },
        }
    }
}

/// Turn one column of cells into a [`Column`], or `None` when the policy
/// drops text columns.
fn finish_column(
    name: String,
    cells: Vec<Cell>,
    policy: NonNumericPolicy,
) -> Result<Option<Column>, LoadError> {
    if policy == NonNumericPolicy::DropColumn
        && cells.iter().any(|c| matches!(c, Cell::Text { .. }))
    {
        log::debug!("Dropping non-numeric column '{name}'");
        return Ok(None);
    }

    let values = cells
        .into_iter()
        .map(|cell| match cell {
            Cell::Number(v) => Ok(v),
            Cell::Missing { row } => Err(LoadError::MissingValue {
                row,
                column: name.clone(),
            }),
            Cell::Text { row, value } => Err(LoadError::NonNumeric {
                row,
                column: name.clone(),
                value,
            }),
        })
        .collect::<Result<Vec<f64>, LoadError>>()?;

    Ok(Some(Column { name, values }))
}

fn finish_table(
    columns: Vec<(String, Vec<Cell>)>,
    policy: NonNumericPolicy,
) -> Result<Table, LoadError> {
    let mut kept = Vec::with_capacity(columns.len());
    for (name, cells) in columns {
        if let Some(column) = finish_column(name, cells, policy)? {
            kept.push(column);
        }
    }
    Table::from_columns(kept)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one value per field.
/// A row whose field count differs from the header is rejected.
fn load_csv(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    let mut reader = csv_reader(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut columns: Vec<(String, Vec<Cell>)> =
        headers.iter().map(|h| (h.clone(), Vec::new())).collect();

    for result in reader.records() {
        let record = result?;
        let row = record.position().map_or(0, |p| p.line());

        if record.len() != headers.len() {
            return Err(LoadError::MalformedRow {
                row,
                expected: headers.len(),
                found: record.len(),
            });
        }

        for (field, (_, cells)) in record.iter().zip(columns.iter_mut()) {
            cells.push(Cell::parse(field, row));
        }
    }

    finish_table(columns, options.non_numeric)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Two layouts are accepted; key order is preserved in both.
///
/// ```json
/// { "x": [-20.0, -19.9], "y1": [0.91, 0.84] }
/// ```
///
/// ```json
/// [ { "x": -20.0, "y1": 0.91 }, { "x": -19.9, "y1": 0.84 } ]
/// ```
fn load_json(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    let root: JsonValue = serde_json::from_reader(BufReader::new(open(path)?))?;

    match root {
        JsonValue::Object(map) => {
            let mut columns = Vec::with_capacity(map.len());
            for (name, value) in map {
                let values = value
                    .as_array()
                    .ok_or_else(|| LoadError::Format(format!("column '{name}' is not an array")))?;
                let cells = values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Cell::from_json(v, i as u64 + 1))
                    .collect();
                columns.push((name, cells));
            }
            finish_table(columns, options.non_numeric)
        }
        JsonValue::Array(records) => {
            let Some(first) = records.first() else {
                return Ok(Table::default());
            };
            let headers: Vec<String> = first
                .as_object()
                .ok_or_else(|| LoadError::Format("record 1 is not a JSON object".into()))?
                .keys()
                .cloned()
                .collect();

            let mut columns: Vec<(String, Vec<Cell>)> = headers
                .iter()
                .map(|h| (h.clone(), Vec::with_capacity(records.len())))
                .collect();

            for (i, rec) in records.iter().enumerate() {
                let row = i as u64 + 1;
                let obj = rec
                    .as_object()
                    .ok_or_else(|| LoadError::Format(format!("record {row} is not a JSON object")))?;
                if obj.len() != headers.len() {
                    return Err(LoadError::MalformedRow {
                        row,
                        expected: headers.len(),
                        found: obj.len(),
                    });
                }
                for (name, cells) in columns.iter_mut() {
                    let value = obj
                        .get(name.as_str())
                        .ok_or_else(|| LoadError::MissingColumn(name.clone()))?;
                    cells.push(Cell::from_json(value, row));
                }
            }
            finish_table(columns, options.non_numeric)
        }
        _ => Err(LoadError::Format(
            "expected a column object or an array of records".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are flat numeric arrays, as written by
/// `df.to_parquet()` or by the `generate_dataset` binary.
fn load_parquet(path: &Path, options: LoadOptions) -> Result<Table, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut columns: Vec<(String, Vec<Cell>)> = schema
        .fields()
        .iter()
        .map(|f| (f.name().clone(), Vec::new()))
        .collect();

    let mut row_offset: u64 = 0;
    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, (_, cells)) in columns.iter_mut().enumerate() {
            append_arrow_cells(batch.column(col_idx).as_ref(), row_offset, cells);
        }
        row_offset += batch.num_rows() as u64;
    }

    finish_table(columns, options.non_numeric)
}

/// Append one batch of an Arrow column as cells.
fn append_arrow_cells(col: &dyn Array, row_offset: u64, cells: &mut Vec<Cell>) {
    fn push(values: impl Iterator<Item = Option<f64>>, row_offset: u64, cells: &mut Vec<Cell>) {
        for (i, v) in values.enumerate() {
            let row = row_offset + i as u64 + 1;
            cells.push(match v {
                Some(f) if f.is_finite() => Cell::Number(f),
                _ => Cell::Missing { row },
            });
        }
    }

    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        push(arr.iter(), row_offset, cells);
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        push(arr.iter().map(|v| v.map(f64::from)), row_offset, cells);
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        push(arr.iter().map(|v| v.map(|i| i as f64)), row_offset, cells);
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        push(arr.iter().map(|v| v.map(f64::from)), row_offset, cells);
    } else {
        let value = format!("{:?}", col.data_type());
        cells.extend((0..col.len()).map(|i| Cell::Text {
            row: row_offset + i as u64 + 1,
            value: value.clone(),
        }));
    }
}
