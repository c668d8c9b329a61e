use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("A recipe named \"{0}\" already exists")]
    DuplicateTitle(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),

    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image too large: {size} bytes (maximum {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Step {index} is out of range for {len} instructions")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
