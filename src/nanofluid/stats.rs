use std::collections::BTreeMap;

use crate::data::model::Table;

use super::NanofluidRecord;

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation, `None` when either side has no variance.
pub fn pearson(a: &[f64], b: &[f64]) -> Option<f64> {
    let n = a.len().min(b.len());
    if n < 2 {
        return None;
    }
    let mean_a = mean(&a[..n])?;
    let mean_b = mean(&b[..n])?;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b).take(n) {
        let (da, db) = (x - mean_a, y - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return None;
    }
    Some((cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0))
}

/// Pairwise Pearson correlations of every column in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major; `None` where a column is constant.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn from_table(table: &Table) -> Self {
        let columns = table.columns();
        let values = columns
            .iter()
            .map(|a| {
                columns
                    .iter()
                    .map(|b| pearson(&a.values, &b.values))
                    .collect()
            })
            .collect();
        Self {
            labels: columns.iter().map(|c| c.name.clone()).collect(),
            values,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Distribution summaries
// ---------------------------------------------------------------------------

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Equal-width histogram. The last bin includes its right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if values.is_empty() || bins == 0 {
            return None;
        }
        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0; bins];
        for &v in values {
            let bin = (((v - lo) / width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        Some(Self { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Centre of each bin.
    pub fn centres(&self) -> impl Iterator<Item = f64> + '_ {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0)
    }
}

/// Linear-interpolated quantile of sorted data, `q` in `[0, 1]`.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box-plot summary with Tukey whiskers (furthest data within 1.5 × IQR).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    pub fn new(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let lower_whisker = sorted.iter().copied().find(|&v| v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= hi_fence)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

// ---------------------------------------------------------------------------
// Per nanoparticle type
// ---------------------------------------------------------------------------

/// Values of one field grouped by nanoparticle type, types sorted by name.
pub fn by_type(
    records: &[NanofluidRecord],
    field: impl Fn(&NanofluidRecord) -> f64,
) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.nanoparticle_type.clone())
            .or_default()
            .push(field(r));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn record(kind: &str, viscosity: f64) -> NanofluidRecord {
        NanofluidRecord {
            nanoparticle_type: kind.into(),
            flow_velocity: 1.0,
            heat_transfer_coefficient: 1000.0,
            thermal_conductivity: 0.6,
            viscosity,
        }
    }

    #[test]
    fn pearson_of_linear_data() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&a, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &down).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&a, &[1.0; 4]), None);
    }

    #[test]
    fn pearson_hand_computed() {
        // cov = 1, var_a = var_b = 2 (sums about the mean)
        let r = pearson(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0]).unwrap();
        assert!((r - 0.5).abs() < 1e-12);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let table = Table::from_columns(vec![
            Column::new("a", vec![1.0, 2.0, 3.0]),
            Column::new("b", vec![3.0, 1.0, 2.0]),
            Column::new("flat", vec![5.0, 5.0, 5.0]),
        ])
        .unwrap();
        let m = CorrelationMatrix::from_table(&table);

        assert_eq!(m.labels, ["a", "b", "flat"]);
        assert!((m.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(m.get(0, 1), m.get(1, 0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn histogram_counts_include_right_edge() {
        let h = Histogram::new(&[0.0, 1.0, 1.0, 2.0, 4.0], 4).unwrap();
        assert_eq!(h.edges, [0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(h.counts, [1, 2, 1, 1]);
        assert_eq!(h.bin_width(), 1.0);
        assert_eq!(h.centres().next(), Some(0.5));
    }

    #[test]
    fn histogram_of_constant_data() {
        let h = Histogram::new(&[3.0, 3.0], 2).unwrap();
        assert_eq!(h.edges, [2.5, 3.0, 3.5]);
        assert_eq!(h.counts, [0, 2]);
        assert!(Histogram::new(&[], 10).is_none());
    }

    #[test]
    fn box_stats_with_outlier() {
        let b = BoxStats::new(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        // fence = 4.75 + 1.5 * 2.5 = 8.5
        assert_eq!(b.upper_whisker, 5.0);
    }

    #[test]
    fn groups_by_type_in_name_order() {
        let records = [record("TiO2", 1.0), record("Ag", 2.0), record("TiO2", 3.0)];
        let groups = by_type(&records, |r| r.viscosity);
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Ag", "TiO2"]);
        assert_eq!(groups["TiO2"], [1.0, 3.0]);
        assert_eq!(mean(&groups["TiO2"]), Some(2.0));
    }
}
