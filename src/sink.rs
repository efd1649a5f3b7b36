//! File sinks for fit results.
//!
//! The interactive window is the main consumer of an [`Analysis`]; these
//! sinks write the same series and classifications to disk.
//!
//! [`Analysis`]: crate::pipeline::Analysis

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::model::Series;
use crate::fit::Classification;

/// Something that consumes labelled series and classification results.
pub trait PresentationSink {
    fn render(&mut self, series: &[Series], classifications: &[Classification]) -> Result<()>;
}

// ---------------------------------------------------------------------------
// CSV: one row per test point
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ClassificationRow<'a> {
    x: f64,
    y: f64,
    delta_y: Option<f64>,
    ideal_function: Option<&'a str>,
    training_series: Option<&'a str>,
    allowed_deviation: Option<f64>,
}

impl<'a> From<&'a Classification> for ClassificationRow<'a> {
    fn from(c: &'a Classification) -> Self {
        let m = c.assigned.as_ref();
        Self {
            x: c.point.x,
            y: c.point.y,
            delta_y: m.map(|m| m.deviation),
            ideal_function: m.map(|m| m.candidate.as_str()),
            training_series: m.map(|m| m.training.as_str()),
            allowed_deviation: m.map(|m| m.allowed),
        }
    }
}

/// Writes the classification table; unassigned points leave the candidate
/// fields empty.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PresentationSink for CsvSink {
    fn render(&mut self, _series: &[Series], classifications: &[Classification]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        for c in classifications {
            writer
                .serialize(ClassificationRow::from(c))
                .context("writing classification row")?;
        }
        writer.flush()?;
        log::info!(
            "Wrote {} classifications to {}",
            classifications.len(),
            self.path.display()
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON: series and classifications in one document
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SeriesDoc<'a> {
    label: &'a str,
    points: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    series: Vec<SeriesDoc<'a>>,
    classifications: &'a [Classification],
}

pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PresentationSink for JsonSink {
    fn render(&mut self, series: &[Series], classifications: &[Classification]) -> Result<()> {
        let doc = Document {
            series: series
                .iter()
                .map(|s| SeriesDoc {
                    label: &s.label,
                    points: s.points().map(|(x, y)| [x, y]).collect(),
                })
                .collect(),
            classifications,
        };

        let file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &doc).context("writing JSON")?;
        log::info!("Wrote {} series to {}", series.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Point;
    use crate::fit::Match;

    fn results() -> (Vec<Series>, Vec<Classification>) {
        let series = vec![Series::new("y1", vec![1.0, 2.0], vec![2.0, 4.0]).unwrap()];
        let classifications = vec![
            Classification {
                point: Point::new(2.0, 4.05),
                assigned: Some(Match {
                    candidate: "y7".into(),
                    training: "y1".into(),
                    deviation: 0.05,
                    allowed: 0.1,
                }),
                nearest_deviation: 0.05,
            },
            Classification {
                point: Point::new(1.0, 9.0),
                assigned: None,
                nearest_deviation: 7.0,
            },
        ];
        (series, classifications)
    }

    #[test]
    fn csv_sink_writes_one_row_per_point() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let (series, classifications) = results();

        CsvSink::new(&path).render(&series, &classifications).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "x,y,delta_y,ideal_function,training_series,allowed_deviation",
                "2.0,4.05,0.05,y7,y1,0.1",
                "1.0,9.0,,,,",
            ]
        );
    }

    #[test]
    fn json_sink_writes_series_and_classifications() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let (series, classifications) = results();

        JsonSink::new(&path).render(&series, &classifications).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["series"][0]["label"], "y1");
        assert_eq!(doc["series"][0]["points"][1][1], 4.0);
        assert_eq!(doc["classifications"][0]["assigned"]["candidate"], "y7");
        assert!(doc["classifications"][1]["assigned"].is_null());
    }
}
