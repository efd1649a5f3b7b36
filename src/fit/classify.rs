//! Deviation classification of test points.
//!
//! A test point matches a fit when its distance to the fit's candidate at the
//! same x is at most `max_deviation × threshold_factor`. Among matches the
//! smallest distance wins; equal distances keep the earlier fit.

use serde::Serialize;

use crate::data::model::Point;

use super::select::FitResult;
use super::FitError;

/// √2, the conventional widening of the training deviation.
pub const DEFAULT_THRESHOLD_FACTOR: f64 = std::f64::consts::SQRT_2;

/// The fit a test point was assigned to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub candidate: String,
    pub training: String,
    pub deviation: f64,
    pub allowed: f64,
}

/// Outcome for one test point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub point: Point,
    /// `None` when no candidate is within its allowed deviation.
    pub assigned: Option<Match>,
    /// Smallest deviation to any candidate defined at `point.x`.
    pub nearest_deviation: f64,
}

impl Classification {
    pub fn is_assigned(&self) -> bool {
        self.assigned.is_some()
    }

    pub fn candidate(&self) -> Option<&str> {
        self.assigned.as_ref().map(|m| m.candidate.as_str())
    }
}

/// What [`classify_all`] does with a point outside every candidate's domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutOfDomainPolicy {
    #[default]
    Fail,
    /// Log a warning and leave the point out of the results.
    Skip,
}

fn check_threshold(threshold_factor: f64) -> Result<(), FitError> {
    if threshold_factor.is_finite() && threshold_factor >= 0.0 {
        Ok(())
    } else {
        Err(FitError::InvalidThresholdFactor(threshold_factor))
    }
}

/// Classify one test point against the retained fits.
pub fn classify(
    point: Point,
    fits: &[FitResult],
    threshold_factor: f64,
) -> Result<Classification, FitError> {
    check_threshold(threshold_factor)?;

    let mut nearest: Option<f64> = None;
    let mut assigned: Option<Match> = None;

    for fit in fits {
        let Some(predicted) = fit.candidate.y_at(point.x) else {
            continue;
        };
        let deviation = (point.y - predicted).abs();
        nearest = Some(nearest.map_or(deviation, |n| n.min(deviation)));

        let allowed = fit.allowed_deviation(threshold_factor);
        if !(deviation <= allowed) {
            continue;
        }
        if assigned.as_ref().map_or(true, |m| deviation < m.deviation) {
            assigned = Some(Match {
                candidate: fit.candidate.label.clone(),
                training: fit.training.label.clone(),
                deviation,
                allowed,
            });
        }
    }

    let nearest_deviation = nearest.ok_or(FitError::PointOutOfDomain { x: point.x })?;
    Ok(Classification {
        point,
        assigned,
        nearest_deviation,
    })
}

/// Classify a batch of points, in input order.
pub fn classify_all(
    points: &[Point],
    fits: &[FitResult],
    threshold_factor: f64,
    policy: OutOfDomainPolicy,
) -> Result<Vec<Classification>, FitError> {
    check_threshold(threshold_factor)?;

    let mut out = Vec::with_capacity(points.len());
    for &point in points {
        match classify(point, fits, threshold_factor) {
            Ok(c) => out.push(c),
            Err(FitError::PointOutOfDomain { x }) if policy == OutOfDomainPolicy::Skip => {
                log::warn!("Skipping test point ({x}, {}): outside every candidate domain", point.y);
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "Classified {} of {} test points (threshold factor {threshold_factor:.4})",
        out.iter().filter(|c| c.is_assigned()).count(),
        points.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Series;

    fn series(label: &str, points: &[(f64, f64)]) -> Series {
        let (x, y) = points.iter().copied().unzip();
        Series::new(label, x, y).unwrap()
    }

    fn fit(training: &str, candidate: Series, max_deviation: f64) -> FitResult {
        FitResult {
            training: series(training, &[(1.0, 0.0)]),
            candidate,
            error: 0.0,
            max_deviation,
        }
    }

    fn line_a() -> Series {
        series("a", &[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)])
    }

    #[test]
    fn zero_deviation_rejects_any_offset() {
        let fits = [fit("y1", line_a(), 0.0)];
        let c = classify(Point::new(2.0, 4.01), &fits, DEFAULT_THRESHOLD_FACTOR).unwrap();
        assert!(!c.is_assigned());
        assert!((c.nearest_deviation - 0.01).abs() < 1e-9);
    }

    #[test]
    fn point_on_the_curve_is_assigned() {
        let fits = [fit("y1", line_a(), 0.0)];
        let c = classify(Point::new(2.0, 4.0), &fits, DEFAULT_THRESHOLD_FACTOR).unwrap();
        assert_eq!(c.candidate(), Some("a"));
        assert_eq!(c.assigned.unwrap().training, "y1");
    }

    #[test]
    fn closest_match_wins_over_first_match() {
        let far = series("far", &[(1.0, 0.0), (2.0, 10.0)]);
        let near = series("near", &[(1.0, 0.0), (2.0, 10.8)]);
        // Both accept the point; "near" is listed second but is closer.
        let fits = [fit("y1", far, 1.0), fit("y2", near, 1.0)];

        let c = classify(Point::new(2.0, 10.6), &fits, 1.0).unwrap();
        let m = c.assigned.unwrap();
        assert_eq!(m.candidate, "near");
        assert!((m.deviation - 0.2).abs() < 1e-9);
        assert_eq!(m.allowed, 1.0);
    }

    #[test]
    fn closest_is_chosen_among_matches_only() {
        // "tight" is nearer but its band is too narrow, so "loose" is taken.
        let tight = series("tight", &[(0.0, 5.0)]);
        let loose = series("loose", &[(0.0, 7.0)]);
        let fits = [fit("y1", tight, 0.1), fit("y2", loose, 2.0)];

        let c = classify(Point::new(0.0, 5.5), &fits, 1.0).unwrap();
        assert_eq!(c.candidate(), Some("loose"));
        assert!((c.nearest_deviation - 0.5).abs() < 1e-12);
    }

    #[test]
    fn candidates_without_the_x_are_skipped() {
        let partial = series("partial", &[(5.0, 0.0)]);
        let fits = [fit("y1", partial, 1.0), fit("y2", line_a(), 1.0)];
        let c = classify(Point::new(3.0, 6.5), &fits, 1.0).unwrap();
        assert_eq!(c.candidate(), Some("a"));
    }

    #[test]
    fn point_outside_every_domain_fails() {
        let fits = [fit("y1", line_a(), 1.0)];
        let err = classify(Point::new(2.5, 5.0), &fits, 1.0).unwrap_err();
        assert_eq!(err, FitError::PointOutOfDomain { x: 2.5 });
    }

    #[test]
    fn invalid_threshold_factor() {
        let fits = [fit("y1", line_a(), 1.0)];
        for factor in [-1.0, f64::NAN, f64::INFINITY] {
            let err = classify(Point::new(1.0, 2.0), &fits, factor).unwrap_err();
            assert!(matches!(err, FitError::InvalidThresholdFactor(_)));
        }
    }

    #[test]
    fn batch_policy_controls_out_of_domain_points() {
        let fits = [fit("y1", line_a(), 0.5)];
        let points = [Point::new(1.0, 2.1), Point::new(9.0, 0.0), Point::new(3.0, 9.0)];

        let err = classify_all(&points, &fits, 1.0, OutOfDomainPolicy::Fail).unwrap_err();
        assert_eq!(err, FitError::PointOutOfDomain { x: 9.0 });

        let out = classify_all(&points, &fits, 1.0, OutOfDomainPolicy::Skip).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].is_assigned());
        assert!(!out[1].is_assigned());
    }

    #[test]
    fn larger_factor_never_classifies_fewer_points() {
        let b = series("b", &[(1.0, 1.0), (2.0, 3.0), (3.0, 5.0)]);
        let fits = [fit("y1", line_a(), 0.3), fit("y2", b, 0.7)];
        let points: Vec<Point> = (0..60)
            .map(|i| {
                let x = (i % 3 + 1) as f64;
                Point::new(x, 2.0 * x + (i as f64 - 30.0) * 0.05)
            })
            .collect();

        let mut previous = 0;
        for factor in [0.0, 0.5, 1.0, DEFAULT_THRESHOLD_FACTOR, 2.0, 4.0] {
            let assigned = classify_all(&points, &fits, factor, OutOfDomainPolicy::Fail)
                .unwrap()
                .iter()
                .filter(|c| c.is_assigned())
                .count();
            assert!(assigned >= previous, "factor {factor}: {assigned} < {previous}");
            previous = assigned;
        }
        assert!(previous > 0);
    }

    #[test]
    fn qualifying_point_is_never_unassigned() {
        let fits = [fit("y1", line_a(), 0.25)];
        for dy in [-0.25, -0.1, 0.0, 0.2, 0.25] {
            let c = classify(Point::new(3.0, 6.0 + dy), &fits, 1.0).unwrap();
            assert!(c.is_assigned(), "dy = {dy}");
        }
    }
}
