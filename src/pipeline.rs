//! Batch pipeline: tables in, fits and classifications out.
//!
//! Owns nothing global; callers keep the loaded tables and the resulting
//! [`Analysis`] and pass them around explicitly.

use std::fmt::Write as _;
use std::ops::RangeInclusive;

use anyhow::{Context, Result};

use crate::data::model::{Point, Series, Table};
use crate::data::validate::{check_table, Issue};
use crate::fit::{
    classify_all, fit_all, Classification, FitError, FitResult, OutOfDomainPolicy,
    DEFAULT_THRESHOLD_FACTOR,
};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Name of the shared x column in the training and ideal tables.
    pub x_column: String,
    pub threshold_factor: f64,
    /// Range every x value is expected to fall in.
    pub x_range: RangeInclusive<f64>,
    pub out_of_domain: OutOfDomainPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            x_column: "x".to_string(),
            threshold_factor: DEFAULT_THRESHOLD_FACTOR,
            x_range: -20.0..=20.0,
            out_of_domain: OutOfDomainPolicy::Fail,
        }
    }
}

/// Integrity issues of the training and ideal tables.
pub fn integrity_issues(training: &Table, ideal: &Table, config: &PipelineConfig) -> Vec<Issue> {
    let mut issues = check_table("training", training, &config.x_column, &config.x_range);
    issues.extend(check_table("ideal", ideal, &config.x_column, &config.x_range));
    for issue in &issues {
        log::warn!("{issue}");
    }
    issues
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub training: Vec<Series>,
    pub ideal: Vec<Series>,
    pub fits: Vec<FitResult>,
    pub test_points: Vec<Point>,
    pub classifications: Vec<Classification>,
    pub threshold_factor: f64,
}

impl Analysis {
    pub fn run(
        training: &Table,
        ideal: &Table,
        test_points: &[Point],
        config: &PipelineConfig,
    ) -> Result<Self> {
        let training_series = training
            .all_series(&config.x_column)
            .context("reading training series")?;
        let ideal_series = ideal
            .all_series(&config.x_column)
            .context("reading ideal functions")?;

        let fits = fit_all(&training_series, &ideal_series).context("selecting ideal functions")?;
        let classifications = classify_all(
            test_points,
            &fits,
            config.threshold_factor,
            config.out_of_domain,
        )
        .context("classifying test points")?;

        Ok(Self {
            training: training_series,
            ideal: ideal_series,
            fits,
            test_points: test_points.to_vec(),
            classifications,
            threshold_factor: config.threshold_factor,
        })
    }

    /// Re-run only the classification step, e.g. after the threshold changed.
    /// On error the previous classifications are kept.
    pub fn reclassify(
        &mut self,
        threshold_factor: f64,
        policy: OutOfDomainPolicy,
    ) -> Result<(), FitError> {
        self.classifications = classify_all(&self.test_points, &self.fits, threshold_factor, policy)?;
        self.threshold_factor = threshold_factor;
        Ok(())
    }

    pub fn assigned_count(&self) -> usize {
        self.classifications.iter().filter(|c| c.is_assigned()).count()
    }

    /// Training series followed by the selected candidates, each once.
    pub fn plotted_series(&self) -> Vec<Series> {
        let mut out = self.training.clone();
        for fit in &self.fits {
            if !out.iter().any(|s| s.label == fit.candidate.label) {
                out.push(fit.candidate.clone());
            }
        }
        out
    }

    /// Plain-text report for headless runs.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<12} {:<12} {:>14} {:>14}", "training", "ideal", "sse", "max dev");
        for fit in &self.fits {
            let _ = writeln!(
                out,
                "{:<12} {:<12} {:>14.6} {:>14.6}",
                fit.training.label, fit.candidate.label, fit.error, fit.max_deviation
            );
        }
        let _ = writeln!(
            out,
            "\n{} of {} test points assigned (threshold factor {:.4})",
            self.assigned_count(),
            self.classifications.len(),
            self.threshold_factor
        );
        for fit in &self.fits {
            let n = self
                .classifications
                .iter()
                .filter(|c| {
                    c.assigned
                        .as_ref()
                        .is_some_and(|m| m.training == fit.training.label)
                })
                .count();
            let _ = writeln!(out, "  {:<12} {n}", fit.candidate.label);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn tables() -> (Table, Table) {
        let training = Table::from_columns(vec![
            Column::new("x", vec![1.0, 2.0, 3.0]),
            Column::new("y1", vec![2.0, 4.1, 6.0]),
        ])
        .unwrap();
        let ideal = Table::from_columns(vec![
            Column::new("x", vec![0.0, 1.0, 2.0, 3.0]),
            Column::new("y1", vec![0.0, 1.0, 3.0, 5.0]),
            Column::new("y2", vec![0.0, 2.0, 4.0, 6.0]),
        ])
        .unwrap();
        (training, ideal)
    }

    #[test]
    fn run_selects_and_classifies() {
        let (training, ideal) = tables();
        let points = [Point::new(2.0, 4.1), Point::new(0.0, 3.0)];
        let analysis = Analysis::run(&training, &ideal, &points, &PipelineConfig::default()).unwrap();

        assert_eq!(analysis.fits.len(), 1);
        assert_eq!(analysis.fits[0].candidate.label, "y2");
        assert!((analysis.fits[0].max_deviation - 0.1).abs() < 1e-9);

        assert_eq!(analysis.classifications[0].candidate(), Some("y2"));
        assert!(!analysis.classifications[1].is_assigned());
        assert_eq!(analysis.assigned_count(), 1);

        let labels: Vec<String> = analysis.plotted_series().into_iter().map(|s| s.label).collect();
        assert_eq!(labels, ["y1", "y2"]);
        assert!(analysis.summary().contains("1 of 2 test points assigned"));
    }

    #[test]
    fn reclassify_with_larger_factor() {
        let (training, ideal) = tables();
        let points = [Point::new(3.0, 6.3)];
        let mut analysis =
            Analysis::run(&training, &ideal, &points, &PipelineConfig::default()).unwrap();
        assert_eq!(analysis.assigned_count(), 0);

        analysis.reclassify(5.0, OutOfDomainPolicy::Fail).unwrap();
        assert_eq!(analysis.assigned_count(), 1);
        assert_eq!(analysis.threshold_factor, 5.0);

        assert!(analysis.reclassify(-1.0, OutOfDomainPolicy::Fail).is_err());
        assert_eq!(analysis.threshold_factor, 5.0);
        assert_eq!(analysis.assigned_count(), 1);
    }

    #[test]
    fn out_of_domain_point_keeps_the_fit_error() {
        let (training, ideal) = tables();
        let points = [Point::new(1.5, 0.0)];
        let err = Analysis::run(&training, &ideal, &points, &PipelineConfig::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FitError>(),
            Some(&FitError::PointOutOfDomain { x: 1.5 })
        );
    }

    #[test]
    fn training_outside_ideal_domain_is_a_mismatch() {
        let (_, ideal) = tables();
        let training = Table::from_columns(vec![
            Column::new("x", vec![3.0, 4.0]),
            Column::new("y1", vec![0.0, 0.0]),
        ])
        .unwrap();
        let err = Analysis::run(&training, &ideal, &[], &PipelineConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FitError>(),
            Some(FitError::DomainMismatch { x, .. }) if *x == 4.0
        ));
    }

    #[test]
    fn integrity_issues_cover_both_tables() {
        let (training, ideal) = tables();
        let config = PipelineConfig {
            x_range: 1.0..=3.0,
            ..PipelineConfig::default()
        };
        let issues = integrity_issues(&training, &ideal, &config);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().starts_with("ideal"));
    }
}
