use async_trait::async_trait;

use crate::attr::AttributeMap;
use crate::expr::{QuerySpec, UpdateSpec};

use super::Result;

/// One page of table names from a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePage {
    pub names: Vec<String>,
    /// Continuation token; `None` when the listing is exhausted.
    pub next: Option<String>,
}

/// Client handle for one movie table.
///
/// Implementations own their connection discipline; callers pass the handle
/// explicitly, there is no hidden global client. Every method is a single
/// blocking call from the caller's point of view - no retries, no caching.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Lists table names, one page at a time.
    async fn list_tables(
        &self,
        limit: Option<i32>,
        start_table: Option<String>,
    ) -> Result<TablePage>;

    /// Fetches a single item by its full key. `None` when absent.
    async fn get_item(&self, key: &AttributeMap) -> Result<Option<AttributeMap>>;

    /// Writes an item, replacing any existing record with the same key.
    async fn put_item(&self, item: AttributeMap) -> Result<()>;

    /// Applies an update expression to the item with the given key.
    async fn update_item(&self, key: AttributeMap, update: &UpdateSpec) -> Result<()>;

    /// Deletes the item with the given key.
    async fn delete_item(&self, key: AttributeMap) -> Result<()>;

    /// Runs a filtered scan and returns the raw matching items.
    async fn scan(&self, spec: &QuerySpec) -> Result<Vec<AttributeMap>>;
}
