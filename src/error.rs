//! Error types for the layout core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    /// Free-slot bookkeeping no longer matches the heap file.
    ///
    /// Raised when the registry hands out a slot that is smaller than
    /// requested or extends past the allocation frontier. Callers must
    /// treat this as allocator corruption and stop writing; retrying the
    /// operation cannot succeed.
    #[error("free-slot registry corrupted: {0}")]
    Corruption(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
