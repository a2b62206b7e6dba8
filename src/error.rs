use thiserror::Error;

pub type Result<T, E = RopeError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RopeError {
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: usize, end: usize },
}
