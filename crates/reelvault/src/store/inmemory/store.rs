//! In-memory `TableStore` implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use reelvault_core::attr::AttributeMap;
use reelvault_core::codec;
use reelvault_core::expr::{QuerySpec, UpdateSpec};
use reelvault_core::store::{Result, TablePage, TableStore};

/// In-memory movie table for tests and local experimentation.
///
/// Items are keyed by the composite `(year, title)` key, so scans come back
/// in deterministic order. Filters are evaluated structurally via the
/// predicate kept inside the `QuerySpec`. Data is lost when the store is
/// dropped.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    table_name: String,
    items: Arc<RwLock<BTreeMap<(i32, String), AttributeMap>>>,
}

impl MemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

fn sort_key(item: &AttributeMap) -> Result<(i32, String)> {
    let key = codec::key_of(item)?;
    Ok((key.year, key.title))
}

fn project(item: &AttributeMap, spec: &QuerySpec) -> AttributeMap {
    match &spec.projection {
        Some(fields) => fields
            .iter()
            .filter_map(|field| item.get(field).map(|value| (field.clone(), value.clone())))
            .collect(),
        None => item.clone(),
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn list_tables(
        &self,
        _limit: Option<i32>,
        _start_table: Option<String>,
    ) -> Result<TablePage> {
        Ok(TablePage {
            names: vec![self.table_name.clone()],
            next: None,
        })
    }

    async fn get_item(&self, key: &AttributeMap) -> Result<Option<AttributeMap>> {
        let key = sort_key(key)?;
        let items = self.items.read().await;
        Ok(items.get(&key).cloned())
    }

    async fn put_item(&self, item: AttributeMap) -> Result<()> {
        let key = sort_key(&item)?;
        let mut items = self.items.write().await;
        items.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, key: AttributeMap, update: &UpdateSpec) -> Result<()> {
        let sorted = sort_key(&key)?;
        let mut items = self.items.write().await;
        // The store creates the item from its key when it doesn't exist yet.
        let item = items.entry(sorted).or_insert(key);
        for (field, value) in &update.sets {
            item.insert(field.clone(), value.clone());
        }
        Ok(())
    }

    async fn delete_item(&self, key: AttributeMap) -> Result<()> {
        let key = sort_key(&key)?;
        let mut items = self.items.write().await;
        // Deleting an absent item is not an error, matching the store.
        items.remove(&key);
        Ok(())
    }

    async fn scan(&self, spec: &QuerySpec) -> Result<Vec<AttributeMap>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .filter(|item| spec.filter.as_ref().map(|p| p.matches(item)).unwrap_or(true))
            .map(|item| project(item, spec))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::expr::{ExpressionBuilder, Predicate, UpdateBuilder};
    use reelvault_core::movie::{Movie, MovieKey};
    use reelvault_core::scan::post_filter;
    use reelvault_core::schema::{movies_schema, FIELD_RATING, FIELD_TITLE, FIELD_YEAR};

    fn sample_movies() -> Vec<Movie> {
        vec![
            Movie::new(2013, "Prisoners")
                .with_plot("A desperate father takes matters into his own hands.")
                .with_rating(8.2),
            Movie::new(2014, "Transcendence").with_rating(6.3),
            Movie::new(2014, "The Hundred-Foot Journey").with_rating(7.3),
            Movie::new(2015, "The Big New Movie")
                .with_plot("Nothing happens at all.")
                .with_rating(0.0),
        ]
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new("movies");
        for movie in sample_movies() {
            store.put_item(codec::encode(&movie)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = seeded_store().await;
        let key = MovieKey::new(2015, "The Big New Movie");

        let item = store
            .get_item(&codec::encode_key(&key))
            .await
            .unwrap()
            .unwrap();
        let movie = codec::decode(&item).unwrap();

        assert_eq!(movie.title, "The Big New Movie");
        assert_eq!(movie.plot.as_deref(), Some("Nothing happens at all."));
    }

    #[tokio::test]
    async fn test_get_absent_returns_none() {
        let store = seeded_store().await;
        let key = MovieKey::new(1999, "The Matrix");

        assert_eq!(store.get_item(&codec::encode_key(&key)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_rating() {
        let store = seeded_store().await;
        let schema = movies_schema();
        let key = MovieKey::new(2015, "The Big New Movie");

        let update = UpdateBuilder::new(&schema).set(FIELD_RATING, 2.4).build().unwrap();
        store
            .update_item(codec::encode_key(&key), &update)
            .await
            .unwrap();

        let item = store
            .get_item(&codec::encode_key(&key))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(codec::decode(&item).unwrap().rating, 2.4);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded_store().await;
        let key = codec::encode_key(&MovieKey::new(2013, "Prisoners"));

        store.delete_item(key.clone()).await.unwrap();
        assert_eq!(store.get_item(&key).await.unwrap(), None);

        // Deleting again is a no-op.
        store.delete_item(key).await.unwrap();
    }

    #[tokio::test]
    async fn test_scan_with_filter_and_projection() {
        let store = seeded_store().await;
        let schema = movies_schema();

        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::greater_than_equal(FIELD_YEAR, 2014))
            .with_projection([FIELD_TITLE, FIELD_YEAR, FIELD_RATING])
            .build()
            .unwrap();

        let items = store.scan(&spec).await.unwrap();

        assert_eq!(items.len(), 3);
        // Deterministic (year, title) order.
        assert_eq!(
            codec::key_of(&items[0]).unwrap().title,
            "The Hundred-Foot Journey"
        );
        // Projection drops the plot.
        for item in &items {
            assert!(!item.contains_key("Plot"));
            assert!(item.contains_key(FIELD_TITLE));
            assert!(item.contains_key(FIELD_RATING));
        }
    }

    #[tokio::test]
    async fn test_two_stage_scan_pipeline() {
        let store = seeded_store().await;
        let schema = movies_schema();

        // Coarse server-side filter on year, precise client-side filter on
        // rating.
        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::greater_than_equal(FIELD_YEAR, 2014))
            .with_projection([FIELD_TITLE, FIELD_YEAR, FIELD_RATING])
            .build()
            .unwrap();

        let items = store.scan(&spec).await.unwrap();
        let movies = items
            .iter()
            .map(codec::decode)
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        let matches: Vec<Movie> = post_filter(movies, |m| m.rating > 7.0).collect();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "The Hundred-Foot Journey");
    }

    #[tokio::test]
    async fn test_update_creates_missing_item() {
        let store = MemoryStore::new("movies");
        let schema = movies_schema();
        let key = MovieKey::new(2016, "Arrival");

        let update = UpdateBuilder::new(&schema).set(FIELD_RATING, 7.9).build().unwrap();
        store
            .update_item(codec::encode_key(&key), &update)
            .await
            .unwrap();

        let item = store
            .get_item(&codec::encode_key(&key))
            .await
            .unwrap()
            .unwrap();
        let movie = codec::decode(&item).unwrap();
        assert_eq!(movie.rating, 7.9);
        assert_eq!(movie.title, "Arrival");
    }

    #[tokio::test]
    async fn test_list_tables() {
        let store = MemoryStore::new("movies");
        let page = store.list_tables(None, None).await.unwrap();

        assert_eq!(page.names, vec!["movies".to_string()]);
        assert_eq!(page.next, None);
    }
}
