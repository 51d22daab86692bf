/// Errors that can occur while decoding landmark frames.
#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("truncated landmark buffer: expected {expected} floats, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("non-finite coordinate at landmark {index}")]
    NonFiniteCoordinate { index: usize },
}
