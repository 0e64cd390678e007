// Continent error types

use thiserror::Error;

/// Errors produced while resolving a continent request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContinentError {
    /// Key is not present in the table (any string, valid-looking or not)
    #[error("Continent {0} not found")]
    LookupMiss(String),

    /// Request path does not begin with the continents prefix
    #[error("Bad Request: {0}")]
    MalformedPath(String),
}
