//! Store backend implementations.
//!
//! Concrete implementations of the `TableStore` trait from
//! `reelvault_core::store`: the DynamoDB backend the demo targets, and an
//! in-memory backend for tests and local experimentation.

pub mod dynamodb;
pub mod inmemory;
