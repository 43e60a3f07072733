//! Error types for catalog operations.

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error raised by a catalog backend.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The store could not be reached or the connection dropped.
    #[error("catalog connection error: {0}")]
    Connection(String),

    /// A query failed after the connection was established.
    #[error("catalog query error: {0}")]
    Query(String),
}

#[cfg(feature = "postgres")]
impl From<diesel::ConnectionError> for CatalogError {
    fn from(err: diesel::ConnectionError) -> Self {
        CatalogError::Connection(err.to_string())
    }
}

#[cfg(feature = "postgres")]
impl From<diesel::result::Error> for CatalogError {
    fn from(err: diesel::result::Error) -> Self {
        CatalogError::Query(err.to_string())
    }
}
