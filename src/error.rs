use thiserror::Error;

use crate::cluster::ObjectId;

/// Errors returned by the density clustering algorithms in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// An object id outside the database was returned or supplied.
    #[error("unknown object {id}: database has {len} objects")]
    UnknownObject {
        /// The offending id.
        id: ObjectId,
        /// Number of objects in the database.
        len: usize,
    },

    /// A cluster order lists the same object more than once.
    #[error("object {id} appears more than once in the cluster order")]
    DuplicateObject {
        /// The repeated id.
        id: ObjectId,
    },

    /// An internal invariant did not hold. The run is aborted rather than
    /// returning a truncated result.
    #[error("internal inconsistency: {0}")]
    Inconsistent(String),

    /// A distance or neighbor oracle failed. Passed through untouched.
    #[error("oracle failure: {0}")]
    Oracle(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a failure raised by a user-provided oracle.
    pub fn oracle<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Oracle(err.into())
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
