use std::path::Path;

use anyhow::{Context, Result};

use crate::color::ColorMap;
use crate::data::filter::{filtered_indices, init_filter_state, FilterState};
use crate::data::loader::{load_file, load_points};
use crate::data::model::{Point, Table};
use crate::data::validate::Issue;
use crate::fit::OutOfDomainPolicy;
use crate::nanofluid::stats::CorrelationMatrix;
use crate::nanofluid::{load_nanofluid, NanofluidDataset};
use crate::pipeline::{integrity_issues, Analysis, PipelineConfig};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The input files the viewer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Training,
    Ideal,
    Test,
    Nanofluid,
}

impl DatasetKind {
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Training => "training data",
            DatasetKind::Ideal => "ideal functions",
            DatasetKind::Test => "test points",
            DatasetKind::Nanofluid => "nanofluid dataset",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Ideal,
    Training,
    BestFit,
    Classification,
    Nanofluid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NanofluidView {
    #[default]
    Heatmap,
    Scatter,
    Histogram,
    Bar,
    BoxPlot,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: PipelineConfig,

    /// Loaded inputs (None until loaded).
    pub training: Option<Table>,
    pub ideal: Option<Table>,
    pub test_points: Vec<Point>,
    pub nanofluid: Option<NanofluidDataset>,
    pub correlations: Option<CorrelationMatrix>,

    /// Fits and classifications once training and ideal data are present.
    pub analysis: Option<Analysis>,
    pub issues: Vec<Issue>,

    /// Which classified points are shown.
    pub filters: FilterState,

    /// Indices of classifications passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Colour per selected ideal function.
    pub color_map: Option<ColorMap>,

    pub tab: Tab,
    pub nanofluid_view: NanofluidView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            training: None,
            ideal: None,
            test_points: Vec::new(),
            nanofluid: None,
            correlations: None,
            analysis: None,
            issues: Vec::new(),
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            color_map: None,
            tab: Tab::default(),
            nanofluid_view: NanofluidView::default(),
            status_message: None,
        }
    }

    /// Load one input file and rerun the pipeline if it affects the fit.
    pub fn load(&mut self, kind: DatasetKind, path: &Path) -> Result<()> {
        let what = || format!("loading {} from {}", kind.label(), path.display());
        match kind {
            DatasetKind::Training => self.training = Some(load_file(path).with_context(what)?),
            DatasetKind::Ideal => self.ideal = Some(load_file(path).with_context(what)?),
            DatasetKind::Test => self.test_points = load_points(path).with_context(what)?,
            DatasetKind::Nanofluid => {
                let dataset = load_nanofluid(path).with_context(what)?;
                self.correlations = Some(CorrelationMatrix::from_table(&dataset.numeric));
                self.nanofluid = Some(dataset);
                self.status_message = None;
                return Ok(());
            }
        }
        log::info!("Loaded {} from {}", kind.label(), path.display());
        self.recompute()
    }

    /// Run the full pipeline when both training and ideal data are loaded.
    ///
    /// On failure the previous analysis is dropped, so nothing shown is out
    /// of step with the loaded inputs.
    pub fn recompute(&mut self) -> Result<()> {
        let (Some(training), Some(ideal)) = (&self.training, &self.ideal) else {
            return Ok(());
        };
        self.issues = integrity_issues(training, ideal, &self.config);
        match Analysis::run(training, ideal, &self.test_points, &self.config) {
            Ok(analysis) => {
                self.set_analysis(analysis);
                Ok(())
            }
            Err(e) => {
                self.clear_analysis();
                Err(e)
            }
        }
    }

    fn clear_analysis(&mut self) {
        self.analysis = None;
        self.filters = FilterState::default();
        self.color_map = None;
        self.visible_indices.clear();
    }

    /// Ingest a new analysis, initialise filters and colour.
    pub fn set_analysis(&mut self, analysis: Analysis) {
        self.filters = init_filter_state(&analysis.fits);
        self.color_map = Some(ColorMap::new(
            analysis.fits.iter().map(|f| f.candidate.label.as_str()),
        ));
        self.analysis = Some(analysis);
        self.status_message = None;
        self.refilter();
    }

    /// Change the threshold factor and reclassify the test points.
    pub fn set_threshold_factor(&mut self, factor: f64) {
        self.config.threshold_factor = factor;
        self.reclassify();
    }

    pub fn set_out_of_domain(&mut self, policy: OutOfDomainPolicy) {
        self.config.out_of_domain = policy;
        self.reclassify();
    }

    fn reclassify(&mut self) {
        if self.analysis.is_none() {
            // The last run failed or never happened; retry it with the new settings.
            if let Err(e) = self.recompute() {
                self.report_error(&e);
            }
            return;
        }
        let Some(analysis) = &mut self.analysis else {
            return;
        };
        match analysis.reclassify(self.config.threshold_factor, self.config.out_of_domain) {
            Ok(()) => {
                self.status_message = None;
                self.refilter();
            }
            Err(e) => self.report_error(&anyhow::Error::new(e)),
        }
    }

    /// Recompute `visible_indices` after filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = match &self.analysis {
            Some(a) => filtered_indices(&a.classifications, &self.filters),
            None => Vec::new(),
        };
    }

    /// Log an error and show it in the status line.
    pub fn report_error(&mut self, err: &anyhow::Error) {
        log::error!("{err:#}");
        self.status_message = Some(format!("Error: {err:#}"));
    }
}
