//! Nanofluid heat-transfer dataset: typed records plus the numeric view
//! used for correlations.

pub mod stats;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::error::LoadError;
use crate::data::loader::{load_file_with, read_records, LoadOptions, NonNumericPolicy};
use crate::data::model::Table;

/// One measurement row. Field names map the dataset's unit-suffixed headers;
/// any other columns in the file are ignored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NanofluidRecord {
    #[serde(rename = "Nanoparticle_Type")]
    pub nanoparticle_type: String,
    #[serde(rename = "Flow_Velocity (m/s)")]
    pub flow_velocity: f64,
    #[serde(rename = "Heat_Transfer_Coefficient (W/m²K)")]
    pub heat_transfer_coefficient: f64,
    #[serde(rename = "Thermal_Conductivity (W/mK)")]
    pub thermal_conductivity: f64,
    #[serde(rename = "Viscosity (Pa·s)")]
    pub viscosity: f64,
}

/// The loaded dataset.
#[derive(Debug, Clone)]
pub struct NanofluidDataset {
    pub records: Vec<NanofluidRecord>,
    /// Every numeric column of the file, text columns dropped.
    pub numeric: Table,
}

impl NanofluidDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load a nanofluid CSV file.
pub fn load_nanofluid(path: &Path) -> Result<NanofluidDataset, LoadError> {
    let records: Vec<NanofluidRecord> = read_records(path)?;
    let numeric = load_file_with(
        path,
        LoadOptions {
            non_numeric: NonNumericPolicy::DropColumn,
        },
    )?;

    log::info!(
        "Loaded {} nanofluid records ({} numeric columns)",
        records.len(),
        numeric.width()
    );
    Ok(NanofluidDataset { records, numeric })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_typed_records_and_numeric_columns() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Nanoparticle_Type,Temperature (K),Flow_Velocity (m/s),Heat_Transfer_Coefficient (W/m²K),Thermal_Conductivity (W/mK),Viscosity (Pa·s)"
        )
        .unwrap();
        writeln!(file, "CuO,300,0.5,1200,0.65,0.0011").unwrap();
        writeln!(file, "Ag,310,1.5,2100,0.72,0.0009").unwrap();
        file.flush().unwrap();

        let ds = load_nanofluid(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].nanoparticle_type, "Ag");
        assert_eq!(ds.records[0].heat_transfer_coefficient, 1200.0);

        // Temperature is kept in the numeric view, the type column is not.
        assert_eq!(ds.numeric.width(), 5);
        assert_eq!(ds.numeric.column("Temperature (K)"), Some(&[300.0, 310.0][..]));
        assert!(ds.numeric.column("Nanoparticle_Type").is_none());
    }

    #[test]
    fn missing_typed_column_fails() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Nanoparticle_Type,Viscosity (Pa·s)").unwrap();
        writeln!(file, "CuO,0.001").unwrap();
        file.flush().unwrap();

        let err = load_nanofluid(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
