//! Filter, projection, and update expressions.
//!
//! The store does not accept raw field names or literal values inside
//! expression strings; both go through placeholder tokens resolved via
//! side-channel maps. The builders here produce those strings and maps
//! together, validated against the table schema.

mod builder;
mod error;
mod predicate;

pub use builder::{ExpressionBuilder, QuerySpec, UpdateBuilder, UpdateSpec};
pub use error::BuildError;
pub use predicate::{CompareOp, Predicate, ScalarValue};
