//! Error types for the data model and evaluator, following the
//! teacher's per-crate `thiserror` convention (one enum per crate,
//! `anyhow` only at the binary boundary).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path does not resolve against the document: {0}")]
    NotFound(String),

    #[error("cannot index a non-array value with [{0}]")]
    NotAnArray(usize),

    #[error("cannot key a non-object value with {0:?}")]
    NotAnObject(String),
}
