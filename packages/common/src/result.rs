use crate::error::StoreError;

/// Result type alias for document store operations
pub type StoreResult<T> = Result<T, StoreError>;
