//! DynamoDB backend for the movie table.

mod client;
mod conversions;
mod error;
mod store;

pub use client::{create_client, get_table_state, AwsConfig, TableStatus};
pub use store::DynamoStore;
