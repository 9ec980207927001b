//! Attribute value conversion between the core representation and the SDK.
//!
//! Pure functions for translating tagged values at the wire boundary.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use reelvault_core::attr::{AttrValue, AttributeMap};
use reelvault_core::codec::DecodeError;

/// Convert a core attribute value to the SDK representation.
pub fn to_sdk_value(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::N(raw) => AttributeValue::N(raw.clone()),
        AttrValue::S(s) => AttributeValue::S(s.clone()),
        AttrValue::Bool(b) => AttributeValue::Bool(*b),
    }
}

/// Convert an SDK attribute value back to the core representation.
///
/// Lists, maps, sets and binary values have no counterpart in the movie
/// schema.
pub fn from_sdk_value(key: &str, value: &AttributeValue) -> Result<AttrValue, DecodeError> {
    match value {
        AttributeValue::N(raw) => Ok(AttrValue::N(raw.clone())),
        AttributeValue::S(s) => Ok(AttrValue::S(s.clone())),
        AttributeValue::Bool(b) => Ok(AttrValue::Bool(*b)),
        _ => Err(DecodeError::UnsupportedType(key.to_string())),
    }
}

/// Convert a full item to the SDK representation.
pub fn to_sdk_map(item: &AttributeMap) -> HashMap<String, AttributeValue> {
    item.iter()
        .map(|(key, value)| (key.clone(), to_sdk_value(value)))
        .collect()
}

/// Convert a full SDK item back to the core representation.
pub fn from_sdk_map(item: &HashMap<String, AttributeValue>) -> Result<AttributeMap, DecodeError> {
    item.iter()
        .map(|(key, value)| Ok((key.clone(), from_sdk_value(key, value)?)))
        .collect()
}
