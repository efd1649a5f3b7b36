use std::collections::BTreeMap;

use crate::fit::{Classification, FitResult};

// ---------------------------------------------------------------------------
// Filter predicate: which classified points are shown
// ---------------------------------------------------------------------------

/// Per-candidate visibility of classified test points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Candidate label → shown.
    pub candidates: BTreeMap<String, bool>,
    pub show_unassigned: bool,
}

/// Initialise a [`FilterState`] with every selected candidate visible.
pub fn init_filter_state(fits: &[FitResult]) -> FilterState {
    FilterState {
        candidates: fits
            .iter()
            .map(|f| (f.candidate.label.clone(), true))
            .collect(),
        show_unassigned: true,
    }
}

/// Return indices of classifications that pass the filter.
///
/// A point assigned to a candidate the filter does not know is shown.
pub fn filtered_indices(classifications: &[Classification], filter: &FilterState) -> Vec<usize> {
    classifications
        .iter()
        .enumerate()
        .filter(|(_, c)| match c.candidate() {
            Some(label) => filter.candidates.get(label).copied().unwrap_or(true),
            None => filter.show_unassigned,
        })
        .map(|(i, _)| i)
        .collect()
}
