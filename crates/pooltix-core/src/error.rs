use pooltix_domain::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Unknown ticket type: {0}")]
    UnknownTicketType(String),
    #[error("Ticket not found: {0}")]
    TicketNotFound(String),
    #[error("Ticket ids are exhausted after {0}")]
    IdsExhausted(i64),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A mutation could not be written; in-memory state was left untouched.
    #[error("Could not {operation}; the change was not saved ({reason})")]
    Persistence {
        operation: &'static str,
        reason: String,
    },
}
