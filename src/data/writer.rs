use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::Table;

// ---------------------------------------------------------------------------
// Table writers, the inverse of the CSV and Parquet loaders
// ---------------------------------------------------------------------------

/// Write `table` as CSV: header row in column order, then one row per index.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(table.column_names())?;
    for i in 0..table.len() {
        writer.write_record(table.columns().iter().map(|c| c.values[i].to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `table` as a Parquet file of flat, non-nullable Float64 columns.
pub fn write_parquet(path: &Path, table: &Table) -> Result<()> {
    let fields: Vec<Field> = table
        .column_names()
        .map(|name| Field::new(name, DataType::Float64, false))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.values.clone())) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::Column;

    fn table() -> Table {
        Table::from_columns(vec![
            Column::new("x", vec![-20.0, -19.9, 0.1]),
            Column::new("y2", vec![1.5, -0.25, 1e-3]),
            Column::new("y1", vec![400.0, 396.01, 0.01]),
        ])
        .unwrap()
    }

    #[test]
    fn parquet_written_table_loads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ideal.parquet");
        write_parquet(&path, &table()).unwrap();

        let loaded = load_file(&path).unwrap();
        assert_eq!(loaded.column_names().collect::<Vec<_>>(), ["x", "y2", "y1"]);
        assert_eq!(loaded, table());
    }

    #[test]
    fn csv_written_table_loads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ideal.csv");
        write_csv(&path, &table()).unwrap();

        assert_eq!(load_file(&path).unwrap(), table());
    }
}
