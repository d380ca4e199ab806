/// Invalid input handed to the layout pipeline.
///
/// Every variant is detected before any geometry is computed, so a failed
/// call never yields a partial layout.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("before and after must have the same length (before: {before}, after: {after})")]
    LengthMismatch { before: usize, after: usize },
    #[error("no observations to lay out")]
    EmptyInput,
    #[error("label `{label}` occurs in the data but is missing from the label order")]
    MissingFromOrder { label: String },
    #[error("label `{label}` is listed more than once in the label order")]
    DuplicateInOrder { label: String },
    #[error("side captions must be exactly two strings, got {count}")]
    SideCaptionCount { count: usize },
    #[error("aspect must be a finite positive number, got {aspect}")]
    InvalidAspect { aspect: f64 },
    #[error("no color assigned to label `{label}`")]
    MissingColor { label: String },
}

pub type Result<T> = std::result::Result<T, Error>;
