//! Errors raised while encoding aggregate occurrences.

use aggrewrite_ast::{AggregateFunction, ComparisonOp};
use thiserror::Error;

/// Failure to encode one aggregate occurrence.
///
/// Configuration errors mean the wrong encoder was asked to handle a literal;
/// malformed-input errors come from a strategy rejecting the literal's shape.
/// Neither is retried: encoding is deterministic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("aggregate {id}: encoder for {expected} cannot encode aggregate function {found}")]
    UnsupportedFunction {
        id: String,
        expected: AggregateFunction,
        found: AggregateFunction,
    },
    #[error("aggregate {id}: encoder for {function} does not accept operator {operator}")]
    UnsupportedOperator {
        id: String,
        function: AggregateFunction,
        operator: ComparisonOp,
    },
    #[error("aggregate {id}: element {index} of {function} has no weight term")]
    MissingWeight {
        id: String,
        function: AggregateFunction,
        index: usize,
    },
}

impl EncodingError {
    /// True for wiring mistakes (wrong encoder for the literal), false for bad input
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EncodingError::UnsupportedFunction { .. } | EncodingError::UnsupportedOperator { .. }
        )
    }

    /// Id of the occurrence that failed
    pub fn aggregate_id(&self) -> &str {
        match self {
            EncodingError::UnsupportedFunction { id, .. }
            | EncodingError::UnsupportedOperator { id, .. }
            | EncodingError::MissingWeight { id, .. } => id,
        }
    }
}

/// Failure to rewrite a whole program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("no encoder registered for aggregate function {0}")]
    NoEncoder(AggregateFunction),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
