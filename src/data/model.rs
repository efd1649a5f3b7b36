use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Column / Table – a loaded numeric dataset
// ---------------------------------------------------------------------------

/// One named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A numeric dataset. Columns keep the order of the source header; every
/// column has the same number of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, LoadError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(LoadError::ColumnLength {
                    column: bad.name.clone(),
                    expected,
                    found: bad.values.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values of the first column called `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Every column except `x_column`, each paired with it, in header order.
    pub fn all_series(&self, x_column: &str) -> Result<Vec<Series>, LoadError> {
        let x = self
            .column(x_column)
            .ok_or_else(|| LoadError::MissingColumn(x_column.to_string()))?;
        self.columns
            .iter()
            .filter(|c| c.name != x_column)
            .map(|c| Series::new(c.name.clone(), x.to_vec(), c.values.clone()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Series – labelled (x, y) pairs
// ---------------------------------------------------------------------------

/// A labelled sequence of (x, y) pairs with strictly increasing, finite x.
///
/// Training series and candidate (ideal) functions share this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Result<Self, LoadError> {
        let label = label.into();
        if x.len() != y.len() {
            return Err(LoadError::ColumnLength {
                column: label,
                expected: x.len(),
                found: y.len(),
            });
        }
        if let Some(index) = x.iter().zip(&y).position(|(a, b)| !a.is_finite() || !b.is_finite()) {
            return Err(LoadError::MissingValue {
                row: index as u64 + 1,
                column: label,
            });
        }
        if let Some(index) = x.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(LoadError::NonMonotonicX {
                label,
                index: index + 1,
            });
        }
        Ok(Self { label, x, y })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Value at exactly `x`, if `x` is one of the sample positions.
    pub fn y_at(&self, x: f64) -> Option<f64> {
        if x.is_nan() {
            return None;
        }
        self.x
            .binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(Ordering::Less))
            .ok()
            .map(|i| self.y[i])
    }
}

// ---------------------------------------------------------------------------
// Point – one test observation
// ---------------------------------------------------------------------------

/// A single test observation, read by field name from the `x`/`y` header.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
