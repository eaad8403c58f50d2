use crate::config::AssocConfig;
use crate::error::AssocError;
use crate::gate;
use crate::object::ObjectView;
use crate::solver::{GnnSolver, Ssp};
use nalgebra::DMatrix;
use std::collections::HashMap;

/*-----------------------------------------------------------------------------
DataAssociation
-----------------------------------------------------------------------------*/

/// Gated data-association engine.
///
/// One instance owns the immutable per-class-pair thresholds and an
/// assignment solver; each call builds its own score matrix and graph, so a
/// shared instance can serve overlapping perception cycles without locking.
pub struct DataAssociation {
    config: AssocConfig,
    solver: Box<dyn GnnSolver + Send + Sync>,
}

impl DataAssociation {
    pub fn new(config: AssocConfig) -> Self {
        Self::with_solver(config, Box::new(Ssp))
    }

    pub fn with_solver(
        config: AssocConfig,
        solver: Box<dyn GnnSolver + Send + Sync>,
    ) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &AssocConfig {
        &self.config
    }

    /// Score every (tracker, measurement) pair through the gate cascade.
    ///
    /// Rows are trackers, columns are measurements; empty inputs yield the
    /// corresponding empty matrix. Fails if any object carries a label
    /// outside the configured class range.
    pub fn calc_score_matrix(
        &self,
        measurements: &[ObjectView],
        trackers: &[ObjectView],
    ) -> Result<DMatrix<f64>, AssocError> {
        for object in trackers.iter().chain(measurements.iter()) {
            self.config.validate_label(object.label)?;
        }

        let mut score_matrix = DMatrix::zeros(trackers.len(), measurements.len());
        for (tracker_idx, tracker) in trackers.iter().enumerate() {
            for (measurement_idx, measurement) in measurements.iter().enumerate() {
                score_matrix[(tracker_idx, measurement_idx)] =
                    gate::pair_score(tracker, measurement, &self.config);
            }
        }
        Ok(score_matrix)
    }

    /// Solve the maximum-score one-to-one matching over `score_matrix` and
    /// drop any solved pair below the score threshold from both maps.
    ///
    /// The returned maps are exact mutual inverses: `direct` maps tracker
    /// index to measurement index, `reverse` the other way around. Indices
    /// absent from both maps are unmatched.
    pub fn assign(
        &self,
        score_matrix: &DMatrix<f64>,
    ) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
        let (mut direct, mut reverse) = self.solver.maximize_linear_assignment(score_matrix);

        // The solver only guarantees optimality, not threshold compliance.
        let threshold = self.config.score_threshold();
        direct.retain(|&tracker_idx, &mut measurement_idx| {
            score_matrix[(tracker_idx, measurement_idx)] >= threshold
        });
        reverse.retain(|&measurement_idx, &mut tracker_idx| {
            score_matrix[(tracker_idx, measurement_idx)] >= threshold
        });

        (direct, reverse)
    }
}
