use thiserror::Error;

/// Errors that can occur while building an expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("unknown field '{field}' is not part of the table schema")]
    UnknownField { field: String },

    #[error("field '{field}' is a key attribute and cannot be updated")]
    KeyAttribute { field: String },

    #[error("expression builder has nothing to build")]
    EmptyBuilder,

    #[error("AND/OR predicate has no operands")]
    EmptyPredicate,
}
