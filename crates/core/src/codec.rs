//! Conversion between [`Movie`] records and attribute maps.
//!
//! Pure functions, testable in isolation without store access.

use thiserror::Error;

use crate::attr::{format_f64, AttrValue, AttributeMap};
use crate::movie::{Movie, MovieKey};
use crate::schema::{FIELD_PLOT, FIELD_RATING, FIELD_TITLE, FIELD_YEAR};

/// Errors that can occur while decoding an attribute map.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("attribute '{attribute}' is tagged {actual}, expected {expected}")]
    TypeMismatch {
        attribute: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("attribute '{attribute}' holds an invalid number: '{raw}'")]
    InvalidNumber { attribute: String, raw: String },

    #[error("attribute '{0}' uses an unsupported value type")]
    UnsupportedType(String),
}

/// Encode a movie as the store's attribute map.
///
/// `Plot` is omitted when absent; `Rating` is always written, zero included,
/// so a record round-trips unchanged.
pub fn encode(movie: &Movie) -> AttributeMap {
    let mut item = AttributeMap::new();

    item.insert(
        FIELD_YEAR.to_string(),
        AttrValue::number_i64(i64::from(movie.year)),
    );
    item.insert(FIELD_TITLE.to_string(), AttrValue::S(movie.title.clone()));
    if let Some(plot) = &movie.plot {
        item.insert(FIELD_PLOT.to_string(), AttrValue::S(plot.clone()));
    }
    item.insert(
        FIELD_RATING.to_string(),
        AttrValue::N(format_f64(movie.rating)),
    );

    item
}

/// Encode just the composite key.
pub fn encode_key(key: &MovieKey) -> AttributeMap {
    let mut item = AttributeMap::new();
    item.insert(
        FIELD_YEAR.to_string(),
        AttrValue::number_i64(i64::from(key.year)),
    );
    item.insert(FIELD_TITLE.to_string(), AttrValue::S(key.title.clone()));
    item
}

/// Decode a movie from the store's attribute map.
///
/// An empty `Title` decodes successfully; whether that means "not found" is
/// a caller-level convention, not a codec concern.
pub fn decode(item: &AttributeMap) -> Result<Movie, DecodeError> {
    Ok(Movie {
        year: get_i32(item, FIELD_YEAR)?,
        title: get_string(item, FIELD_TITLE)?,
        plot: get_optional_string(item, FIELD_PLOT)?,
        rating: get_optional_f64(item, FIELD_RATING)?.unwrap_or(0.0),
    })
}

/// Extract the composite key from an attribute map.
pub fn key_of(item: &AttributeMap) -> Result<MovieKey, DecodeError> {
    Ok(MovieKey {
        year: get_i32(item, FIELD_YEAR)?,
        title: get_string(item, FIELD_TITLE)?,
    })
}

fn get_string(item: &AttributeMap, key: &'static str) -> Result<String, DecodeError> {
    match item.get(key) {
        None => Err(DecodeError::MissingAttribute(key)),
        Some(AttrValue::S(s)) => Ok(s.clone()),
        Some(other) => Err(DecodeError::TypeMismatch {
            attribute: key.to_string(),
            expected: "S",
            actual: other.type_name(),
        }),
    }
}

fn get_i32(item: &AttributeMap, key: &'static str) -> Result<i32, DecodeError> {
    match item.get(key) {
        None => Err(DecodeError::MissingAttribute(key)),
        Some(AttrValue::N(raw)) => raw.parse().map_err(|_| DecodeError::InvalidNumber {
            attribute: key.to_string(),
            raw: raw.clone(),
        }),
        Some(other) => Err(DecodeError::TypeMismatch {
            attribute: key.to_string(),
            expected: "N",
            actual: other.type_name(),
        }),
    }
}

fn get_optional_string(
    item: &AttributeMap,
    key: &'static str,
) -> Result<Option<String>, DecodeError> {
    match item.get(key) {
        None => Ok(None),
        Some(AttrValue::S(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::TypeMismatch {
            attribute: key.to_string(),
            expected: "S",
            actual: other.type_name(),
        }),
    }
}

fn get_optional_f64(item: &AttributeMap, key: &'static str) -> Result<Option<f64>, DecodeError> {
    match item.get(key) {
        None => Ok(None),
        Some(AttrValue::N(raw)) => raw
            .parse()
            .map(Some)
            .map_err(|_| DecodeError::InvalidNumber {
                attribute: key.to_string(),
                raw: raw.clone(),
            }),
        Some(other) => Err(DecodeError::TypeMismatch {
            attribute: key.to_string(),
            expected: "N",
            actual: other.type_name(),
        }),
    }
}
