use std::fmt;
use std::ops::RangeInclusive;

use super::model::Table;

// ---------------------------------------------------------------------------
// Dataset integrity checks
// ---------------------------------------------------------------------------

/// A problem found in a loaded dataset. These are reported, not raised:
/// the fit itself still decides whether the data is usable.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    Empty {
        dataset: String,
    },
    MissingXColumn {
        dataset: String,
        column: String,
    },
    XOutOfRange {
        dataset: String,
        min: f64,
        max: f64,
        expected: RangeInclusive<f64>,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Empty { dataset } => write!(f, "{dataset}: no rows"),
            Issue::MissingXColumn { dataset, column } => {
                write!(f, "{dataset}: no '{column}' column")
            }
            Issue::XOutOfRange {
                dataset,
                min,
                max,
                expected,
            } => write!(
                f,
                "{dataset}: x spans {min}..{max}, outside {}..{}",
                expected.start(),
                expected.end()
            ),
        }
    }
}

/// Check that `table` has rows, has an x column, and that its x values lie
/// inside `x_range`.
pub fn check_table(
    dataset: &str,
    table: &Table,
    x_column: &str,
    x_range: &RangeInclusive<f64>,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    if table.is_empty() {
        issues.push(Issue::Empty {
            dataset: dataset.to_string(),
        });
    }

    match table.column(x_column) {
        None => issues.push(Issue::MissingXColumn {
            dataset: dataset.to_string(),
            column: x_column.to_string(),
        }),
        Some(x) if !x.is_empty() => {
            let min = x.iter().copied().fold(f64::INFINITY, f64::min);
            let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if !x_range.contains(&min) || !x_range.contains(&max) {
                issues.push(Issue::XOutOfRange {
                    dataset: dataset.to_string(),
                    min,
                    max,
                    expected: x_range.clone(),
                });
            }
        }
        Some(_) => {}
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table(x: Vec<f64>) -> Table {
        let y = vec![0.0; x.len()];
        Table::from_columns(vec![Column::new("x", x), Column::new("y1", y)]).unwrap()
    }

    #[test]
    fn clean_table_has_no_issues() {
        let issues = check_table("train", &table(vec![-20.0, 0.0, 20.0]), "x", &(-20.0..=20.0));
        assert!(issues.is_empty());
    }

    #[test]
    fn x_outside_range_is_reported() {
        let issues = check_table("ideal", &table(vec![-25.0, 0.0]), "x", &(-20.0..=20.0));
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            &issues[0],
            Issue::XOutOfRange { min, .. } if *min == -25.0
        ));
    }

    #[test]
    fn empty_and_missing_column() {
        let issues = check_table("test", &Table::default(), "x", &(-20.0..=20.0));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].to_string(), "test: no 'x' column");
    }
}
