use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("invalid destination record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}
