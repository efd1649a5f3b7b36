//! Best-fit selection: the candidate with the smallest sum of squared
//! residuals wins, and the first candidate wins a tie.

use crate::data::model::Series;

use super::evaluate::{evaluate, CandidateScore, ErrorMap};
use super::FitError;

/// The winning entry of an [`ErrorMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct BestFit {
    /// Position of the candidate in the evaluated set.
    pub index: usize,
    pub candidate: String,
    pub error: f64,
    pub max_deviation: f64,
}

/// Pick the candidate with minimal error. Ties keep the earlier candidate.
pub fn select_best(scores: &ErrorMap) -> Result<BestFit, FitError> {
    let mut best: Option<(usize, &CandidateScore)> = None;

    for (index, score) in scores.scores().iter().enumerate() {
        if best.map_or(true, |(_, current)| score.error < current.error) {
            best = Some((index, score));
        }
    }

    let (index, score) = best.ok_or(FitError::EmptyCandidateSet)?;
    Ok(BestFit {
        index,
        candidate: score.candidate.clone(),
        error: score.error,
        max_deviation: score.max_deviation,
    })
}

/// A training series together with the candidate selected for it.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub training: Series,
    pub candidate: Series,
    pub error: f64,
    pub max_deviation: f64,
}

impl FitResult {
    /// Acceptance band for test points: `max_deviation × threshold_factor`.
    pub fn allowed_deviation(&self, threshold_factor: f64) -> f64 {
        self.max_deviation * threshold_factor
    }
}

/// Select a candidate for every training series, in training order.
///
/// Several training series may end up with the same candidate.
pub fn fit_all(training: &[Series], candidates: &[Series]) -> Result<Vec<FitResult>, FitError> {
    if candidates.is_empty() {
        return Err(FitError::EmptyCandidateSet);
    }

    let mut fits = Vec::with_capacity(training.len());
    for series in training {
        let scores = evaluate(series, candidates)?;
        for s in scores.scores() {
            log::debug!("{} vs {}: sse = {:.6}", scores.training(), s.candidate, s.error);
        }

        let best = select_best(&scores)?;
        log::info!(
            "Best fit for {}: {} (sse = {:.6}, max deviation = {:.6})",
            series.label,
            best.candidate,
            best.error,
            best.max_deviation
        );

        fits.push(FitResult {
            training: series.clone(),
            candidate: candidates[best.index].clone(),
            error: best.error,
            max_deviation: best.max_deviation,
        });
    }
    Ok(fits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str, y: &[f64]) -> Series {
        let x = (1..=y.len()).map(|i| i as f64).collect();
        Series::new(label, x, y.to_vec()).unwrap()
    }

    fn score(candidate: &str, error: f64) -> CandidateScore {
        CandidateScore {
            candidate: candidate.into(),
            error,
            max_deviation: error.sqrt(),
        }
    }

    #[test]
    fn exact_candidate_beats_offset_candidate() {
        let training = series("y1", &[2.0, 4.0, 6.0]);
        let a = series("a", &[2.0, 4.0, 6.0]);
        let b = series("b", &[1.0, 3.0, 5.0]);

        let best = select_best(&evaluate(&training, &[a, b]).unwrap()).unwrap();
        assert_eq!(best.candidate, "a");
        assert_eq!(best.index, 0);
        assert_eq!(best.error, 0.0);
        assert_eq!(best.max_deviation, 0.0);
    }

    #[test]
    fn tie_goes_to_first_inserted() {
        let map = ErrorMap::new("y1", vec![score("p", 2.0), score("q", 1.0), score("r", 1.0)]);
        let best = select_best(&map).unwrap();
        assert_eq!(best.candidate, "q");
        assert_eq!(best.index, 1);

        let map = ErrorMap::new("y1", vec![score("r", 1.0), score("q", 1.0)]);
        assert_eq!(select_best(&map).unwrap().candidate, "r");
    }

    #[test]
    fn selection_is_idempotent() {
        let map = ErrorMap::new("y1", vec![score("p", 4.0), score("q", 0.5), score("r", 9.0)]);
        assert_eq!(select_best(&map).unwrap(), select_best(&map).unwrap());
    }

    #[test]
    fn empty_map_is_an_error() {
        let err = select_best(&ErrorMap::default()).unwrap_err();
        assert_eq!(err, FitError::EmptyCandidateSet);
    }

    #[test]
    fn fit_all_pairs_each_training_series() {
        let training = [series("y1", &[2.0, 4.0, 6.0]), series("y2", &[0.0, 0.1, 0.0])];
        let candidates = [
            series("a", &[2.0, 4.0, 6.0]),
            series("zero", &[0.0, 0.0, 0.0]),
        ];

        let fits = fit_all(&training, &candidates).unwrap();
        assert_eq!(fits.len(), 2);
        assert_eq!(fits[0].candidate.label, "a");
        assert_eq!(fits[1].training.label, "y2");
        assert_eq!(fits[1].candidate.label, "zero");
        assert!((fits[1].max_deviation - 0.1).abs() < 1e-12);
        assert!((fits[1].allowed_deviation(2.0) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn fit_all_without_candidates_fails() {
        let training = [series("y1", &[1.0])];
        assert_eq!(
            fit_all(&training, &[]).unwrap_err(),
            FitError::EmptyCandidateSet
        );
    }
}
