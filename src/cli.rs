//! Command-line flags for the viewer and its headless batch mode.

use std::path::PathBuf;

use clap::Parser;

use crate::fit::{OutOfDomainPolicy, DEFAULT_THRESHOLD_FACTOR};
use crate::pipeline::PipelineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "ideal-fit",
    version,
    about = "Select ideal functions for training data and classify test points"
)]
pub struct Cli {
    /// Training data (CSV, JSON or Parquet) with an `x` column.
    #[arg(long)]
    pub train: Option<PathBuf>,

    /// Ideal functions (CSV, JSON or Parquet) sharing the training x-grid.
    #[arg(long)]
    pub ideal: Option<PathBuf>,

    /// Test points, a CSV with `x` and `y` columns.
    #[arg(long)]
    pub test: Option<PathBuf>,

    /// Nanofluid heat-transfer dataset for the explorer tab.
    #[arg(long)]
    pub nanofluid: Option<PathBuf>,

    /// Multiplier on each fit's maximum training deviation.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_FACTOR)]
    pub threshold_factor: f64,

    /// Lower bound of the expected x range, for integrity warnings.
    #[arg(long, default_value_t = -20.0, allow_negative_numbers = true)]
    pub x_min: f64,

    /// Upper bound of the expected x range, for integrity warnings.
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    pub x_max: f64,

    /// Drop test points whose x is not on the ideal grid instead of failing.
    #[arg(long)]
    pub skip_out_of_domain: bool,

    /// Write classified test points to this CSV file.
    #[arg(long)]
    pub export_csv: Option<PathBuf>,

    /// Write plotted series and classifications to this JSON file.
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Run the pipeline, print a report and exit without opening a window.
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            threshold_factor: self.threshold_factor,
            x_range: self.x_min..=self.x_max,
            out_of_domain: if self.skip_out_of_domain {
                OutOfDomainPolicy::Skip
            } else {
                OutOfDomainPolicy::Fail
            },
            ..PipelineConfig::default()
        }
    }
}
