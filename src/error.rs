use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssocError {
    #[error("configuration matrix length {0} is not a positive perfect square")]
    NotSquare(usize),
    #[error("configuration matrices disagree on label count: expected {expected}, got {got}")]
    MatrixSizeMismatch { expected: usize, got: usize },
    #[error("object label {label} is outside the configured {num_labels} classes")]
    LabelOutOfRange { label: usize, num_labels: usize },
}
