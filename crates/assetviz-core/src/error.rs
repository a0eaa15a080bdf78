use thiserror::Error;

/// Rejection of an externally supplied value before it reaches the graph store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid asset ID format: {value:?} (expected 'A' followed by 4-5 digits)")]
    InvalidFormat { value: String },
}
