use crate::data::model::Series;

use super::FitError;

/// Fit quality of one candidate against one training series.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub candidate: String,
    /// Sum of squared residuals.
    pub error: f64,
    /// Largest absolute pointwise residual.
    pub max_deviation: f64,
}

/// Scores of one training series against every candidate, in candidate order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorMap {
    training: String,
    scores: Vec<CandidateScore>,
}

impl ErrorMap {
    pub fn new(training: impl Into<String>, scores: Vec<CandidateScore>) -> Self {
        Self {
            training: training.into(),
            scores,
        }
    }

    /// Label of the training series these scores belong to.
    pub fn training(&self) -> &str {
        &self.training
    }

    pub fn scores(&self) -> &[CandidateScore] {
        &self.scores
    }

    pub fn get(&self, candidate: &str) -> Option<&CandidateScore> {
        self.scores.iter().find(|s| s.candidate == candidate)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Score `training` against every candidate.
///
/// Candidates are looked up at the training x positions exactly; a candidate
/// missing any of them fails with [`FitError::DomainMismatch`].
pub fn evaluate(training: &Series, candidates: &[Series]) -> Result<ErrorMap, FitError> {
    let scores = candidates
        .iter()
        .map(|candidate| score(training, candidate))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ErrorMap::new(training.label.clone(), scores))
}

fn score(training: &Series, candidate: &Series) -> Result<CandidateScore, FitError> {
    let mut error = 0.0;
    let mut max_deviation = 0.0_f64;

    for (x, y) in training.points() {
        let Some(predicted) = candidate.y_at(x) else {
            return Err(FitError::DomainMismatch {
                training: training.label.clone(),
                candidate: candidate.label.clone(),
                x,
            });
        };
        let residual = (y - predicted).abs();
        error += residual * residual;
        max_deviation = max_deviation.max(residual);
    }

    Ok(CandidateScore {
        candidate: candidate.label.clone(),
        error,
        max_deviation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str, points: &[(f64, f64)]) -> Series {
        let (x, y) = points.iter().copied().unzip();
        Series::new(label, x, y).unwrap()
    }

    #[test]
    fn scores_every_candidate_in_order() {
        let training = series("y1", &[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        let candidates = [
            series("a", &[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]),
            series("b", &[(1.0, 1.0), (2.0, 3.0), (3.0, 5.0)]),
            series("c", &[(1.0, 0.0), (2.0, 4.0), (3.0, 9.0)]),
        ];

        let map = evaluate(&training, &candidates).unwrap();
        assert_eq!(map.training(), "y1");
        assert_eq!(map.len(), candidates.len());

        let labels: Vec<&str> = map.scores().iter().map(|s| s.candidate.as_str()).collect();
        assert_eq!(labels, ["a", "b", "c"]);
        assert!(map.scores().iter().all(|s| s.error >= 0.0));

        assert_eq!(map.get("a").unwrap().error, 0.0);
        assert_eq!(map.get("b").unwrap().error, 3.0);
        assert_eq!(map.get("b").unwrap().max_deviation, 1.0);
        assert_eq!(map.get("c").unwrap().error, 13.0);
        assert_eq!(map.get("c").unwrap().max_deviation, 3.0);
    }

    #[test]
    fn wider_candidate_domain_is_accepted() {
        let training = series("y1", &[(2.0, 1.0), (3.0, 1.0)]);
        let wide = series("wide", &[(1.0, 0.0), (2.0, 1.0), (3.0, 2.0), (4.0, 0.0)]);

        let map = evaluate(&training, &[wide]).unwrap();
        assert_eq!(map.scores()[0].error, 1.0);
    }

    #[test]
    fn candidate_missing_a_training_x_is_a_domain_mismatch() {
        let training = series("y1", &[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        let short = series("short", &[(1.0, 0.0), (2.0, 0.0)]);

        let err = evaluate(&training, &[short]).unwrap_err();
        assert_eq!(
            err,
            FitError::DomainMismatch {
                training: "y1".into(),
                candidate: "short".into(),
                x: 3.0,
            }
        );
    }

    #[test]
    fn no_candidates_gives_empty_map() {
        let training = series("y1", &[(1.0, 0.0)]);
        assert!(evaluate(&training, &[]).unwrap().is_empty());
    }
}
