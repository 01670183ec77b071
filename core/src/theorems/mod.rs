//! Theorem object model
//!
//! Statements found in a configuration and the objects they talk about,
//! compared up to equivalence rather than by representation.

mod object;
mod theorem;

pub use object::{ObjectWithPoints, PairKind, PairTheoremObject, TheoremObject};
pub use theorem::{Theorem, TheoremType};

use crate::ir::{ConfigurationObjectType, ObjectId};
use thiserror::Error;

/// Errors raised when building theorems
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TheoremError {
    #[error("Object {object} is a {found}, expected a {expected}")]
    WrongObjectType {
        object: ObjectId,
        expected: ConfigurationObjectType,
        found: ConfigurationObjectType,
    },

    #[error("A {object_type} needs {needed} distinct points, got {found}")]
    NotEnoughPoints {
        object_type: ConfigurationObjectType,
        needed: usize,
        found: usize,
    },

    #[error("Expected a {expected} theorem object, got a {found}")]
    WrongTheoremObject {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid objects for {theorem_type}: {reason}")]
    InvalidObjects {
        theorem_type: TheoremType,
        reason: String,
    },
}

/// Result type for theorem construction
pub type TheoremResult<T> = Result<T, TheoremError>;
