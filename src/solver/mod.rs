//! Assignment solver strategies.

mod ssp;

pub use ssp::Ssp;

use nalgebra::DMatrix;
use std::collections::HashMap;

/// Strategy seam over maximum-score one-to-one assignment.
///
/// Given a non-negative score matrix with trackers as rows and measurements
/// as columns, a solver returns the matching that maximizes the total score
/// of the selected entries. Any subset of rows and columns may stay
/// unmatched; this is not a perfect-matching problem.
pub trait GnnSolver {
    /// Returns `(direct, reverse)` where `direct` maps tracker index to
    /// measurement index and `reverse` is its exact inverse.
    fn maximize_linear_assignment(
        &self,
        score: &DMatrix<f64>,
    ) -> (HashMap<usize, usize>, HashMap<usize, usize>);
}
