use crate::error::AssocError;
use nalgebra::DMatrix;

/*------------------------------------------------------------------------------
AssocConfig struct
------------------------------------------------------------------------------*/

/// Minimum score a solved pair must reach to survive the final filter.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.01;

/// Per-class-pair association thresholds, immutable once constructed.
///
/// Each matrix is square of side `num_labels` and indexed as
/// `(tracker label, measurement label)`; the flat input vectors are read
/// row-major in that same order. This indexing convention is part of the
/// calibration contract and must not be re-derived.
#[derive(Debug, Clone)]
pub struct AssocConfig {
    num_labels: usize,
    can_assign: DMatrix<bool>,
    max_dist: DMatrix<f64>,
    min_area: DMatrix<f64>,
    max_area: DMatrix<f64>,
    max_rad: DMatrix<f64>,
    min_iou: DMatrix<f64>,
    score_threshold: f64,
}

impl AssocConfig {
    /// Build the configuration from six flattened label x label matrices.
    /// The label count is inferred as the integer square root of the vector
    /// length; all six vectors must agree on it.
    pub fn new(
        can_assign: Vec<bool>,
        max_dist: Vec<f64>,
        min_area: Vec<f64>,
        max_area: Vec<f64>,
        max_rad: Vec<f64>,
        min_iou: Vec<f64>,
    ) -> Result<Self, AssocError> {
        let num_labels = infer_side(can_assign.len())?;
        for len in [
            max_dist.len(),
            min_area.len(),
            max_area.len(),
            max_rad.len(),
            min_iou.len(),
        ] {
            let side = infer_side(len)?;
            if side != num_labels {
                return Err(AssocError::MatrixSizeMismatch {
                    expected: num_labels,
                    got: side,
                });
            }
        }

        Ok(Self {
            num_labels,
            can_assign: DMatrix::from_row_slice(num_labels, num_labels, &can_assign),
            max_dist: DMatrix::from_row_slice(num_labels, num_labels, &max_dist),
            min_area: DMatrix::from_row_slice(num_labels, num_labels, &min_area),
            max_area: DMatrix::from_row_slice(num_labels, num_labels, &max_area),
            max_rad: DMatrix::from_row_slice(num_labels, num_labels, &max_rad),
            min_iou: DMatrix::from_row_slice(num_labels, num_labels, &min_iou),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        })
    }

    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn score_threshold(&self) -> f64 {
        self.score_threshold
    }

    pub fn validate_label(&self, label: usize) -> Result<(), AssocError> {
        if label >= self.num_labels {
            return Err(AssocError::LabelOutOfRange {
                label,
                num_labels: self.num_labels,
            });
        }
        Ok(())
    }

    pub fn can_assign(&self, tracker_label: usize, measurement_label: usize) -> bool {
        self.can_assign[(tracker_label, measurement_label)]
    }

    pub fn max_dist(&self, tracker_label: usize, measurement_label: usize) -> f64 {
        self.max_dist[(tracker_label, measurement_label)]
    }

    pub fn min_area(&self, tracker_label: usize, measurement_label: usize) -> f64 {
        self.min_area[(tracker_label, measurement_label)]
    }

    pub fn max_area(&self, tracker_label: usize, measurement_label: usize) -> f64 {
        self.max_area[(tracker_label, measurement_label)]
    }

    pub fn max_rad(&self, tracker_label: usize, measurement_label: usize) -> f64 {
        self.max_rad[(tracker_label, measurement_label)]
    }

    pub fn min_iou(&self, tracker_label: usize, measurement_label: usize) -> f64 {
        self.min_iou[(tracker_label, measurement_label)]
    }
}

fn infer_side(len: usize) -> Result<usize, AssocError> {
    if len == 0 {
        return Err(AssocError::NotSquare(len));
    }
    let side = (len as f64).sqrt() as usize;
    if side * side != len {
        return Err(AssocError::NotSquare(len));
    }
    Ok(side)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: f64, len: usize) -> Vec<f64> {
        vec![value; len]
    }

    #[test]
    fn test_infers_label_count_from_vector_length() {
        let config = AssocConfig::new(
            vec![true; 9],
            flat(1.0, 9),
            flat(0.0, 9),
            flat(10.0, 9),
            flat(1.0, 9),
            flat(0.0, 9),
        )
        .unwrap();
        assert_eq!(config.num_labels(), 3);
        assert_eq!(config.score_threshold(), DEFAULT_SCORE_THRESHOLD);
    }

    #[test]
    fn test_rejects_non_square_length() {
        let result = AssocConfig::new(
            vec![true; 5],
            flat(1.0, 5),
            flat(0.0, 5),
            flat(10.0, 5),
            flat(1.0, 5),
            flat(0.0, 5),
        );
        assert_eq!(result.unwrap_err(), AssocError::NotSquare(5));
    }

    #[test]
    fn test_rejects_empty_matrix() {
        let result = AssocConfig::new(
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(result.unwrap_err(), AssocError::NotSquare(0));
    }

    #[test]
    fn test_rejects_disagreeing_label_counts() {
        let result = AssocConfig::new(
            vec![true; 4],
            flat(1.0, 9),
            flat(0.0, 4),
            flat(10.0, 4),
            flat(1.0, 4),
            flat(0.0, 4),
        );
        assert_eq!(
            result.unwrap_err(),
            AssocError::MatrixSizeMismatch {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn test_flat_vectors_are_tracker_label_row_major() {
        // Row = tracker label, column = measurement label.
        let config = AssocConfig::new(
            vec![true, false, true, true],
            vec![1.0, 2.0, 3.0, 4.0],
            flat(0.0, 4),
            flat(10.0, 4),
            flat(1.0, 4),
            flat(0.0, 4),
        )
        .unwrap();

        assert!(config.can_assign(0, 0));
        assert!(!config.can_assign(0, 1));
        assert!(config.can_assign(1, 0));
        assert_eq!(config.max_dist(0, 1), 2.0);
        assert_eq!(config.max_dist(1, 0), 3.0);
    }

    #[test]
    fn test_label_validation() {
        let config = AssocConfig::new(
            vec![true; 4],
            flat(1.0, 4),
            flat(0.0, 4),
            flat(10.0, 4),
            flat(1.0, 4),
            flat(0.0, 4),
        )
        .unwrap();

        assert!(config.validate_label(1).is_ok());
        assert_eq!(
            config.validate_label(2).unwrap_err(),
            AssocError::LabelOutOfRange {
                label: 2,
                num_labels: 2
            }
        );
    }
}
