//! Seed-file loading and insertion.

use std::path::Path;

use thiserror::Error;

use reelvault_core::codec;
use reelvault_core::movie::Movie;
use reelvault_core::store::{StoreError, TableStore};

/// Errors from reading the seed file or inserting its records.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed file is not a valid movie list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses a JSON array of movies from disk.
pub fn load_movies(path: &Path) -> Result<Vec<Movie>, SeedError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Inserts every movie through the store handle, one put per record.
/// Returns the number inserted.
pub async fn seed_movies(store: &dyn TableStore, movies: &[Movie]) -> Result<u32, SeedError> {
    let mut inserted = 0;
    for movie in movies {
        store.put_item(codec::encode(movie)).await?;
        inserted += 1;
        tracing::debug!(year = movie.year, title = %movie.title, "seeded movie");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::inmemory::MemoryStore;
    use reelvault_core::movie::MovieKey;
    use std::io::Write;

    fn write_seed_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_movies() {
        let file = write_seed_file(
            r#"[
                {"year": 2013, "title": "Rush", "plot": "Formula One rivalry.", "rating": 8.3},
                {"year": 2015, "title": "The Big New Movie"}
            ]"#,
        );

        let movies = load_movies(file.path()).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].title, "Rush");
        assert_eq!(movies[0].rating, 8.3);
        assert_eq!(movies[1].plot, None);
        assert_eq!(movies[1].rating, 0.0);
    }

    #[test]
    fn test_load_movies_rejects_malformed_json() {
        let file = write_seed_file(r#"{"year": 2013}"#);
        assert!(matches!(
            load_movies(file.path()),
            Err(SeedError::Parse(_))
        ));
    }

    #[test]
    fn test_load_movies_missing_file() {
        let result = load_movies(Path::new("/nonexistent/movies.json"));
        assert!(matches!(result, Err(SeedError::Io(_))));
    }

    #[tokio::test]
    async fn test_seed_movies_inserts_all() {
        let store = MemoryStore::new("movies");
        let movies = vec![
            Movie::new(2013, "Rush").with_rating(8.3),
            Movie::new(2013, "Prisoners").with_rating(8.2),
        ];

        let inserted = seed_movies(&store, &movies).await.unwrap();
        assert_eq!(inserted, 2);

        let key = codec::encode_key(&MovieKey::new(2013, "Prisoners"));
        assert!(store.get_item(&key).await.unwrap().is_some());
    }
}
