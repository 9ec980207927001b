//! Tagged attribute values, the store's generic item representation.

use std::collections::HashMap;

/// A type-tagged scalar value.
///
/// Numbers travel as decimal strings per the store's wire convention; the
/// tag (`N`, `S`, `BOOL`) is what the store dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Number, canonical base-10 string form.
    N(String),
    /// String.
    S(String),
    /// Boolean.
    Bool(bool),
}

/// A full item: attribute name to tagged value.
pub type AttributeMap = HashMap<String, AttrValue>;

impl AttrValue {
    /// Number value from an integer.
    pub fn number_i64(value: i64) -> Self {
        AttrValue::N(value.to_string())
    }

    /// Number value from a float, in canonical form.
    pub fn number_f64(value: f64) -> Self {
        AttrValue::N(format_f64(value))
    }

    /// String value.
    pub fn string(value: impl Into<String>) -> Self {
        AttrValue::S(value.into())
    }

    /// The raw decimal string, if this is a number.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttrValue::N(raw) => Some(raw),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttrValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The wire tag of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::N(_) => "N",
            AttrValue::S(_) => "S",
            AttrValue::Bool(_) => "BOOL",
        }
    }
}

/// Canonical base-10 form for a float: the shortest representation that
/// parses back to the exact same value. No exponent notation, no trailing
/// zeros (`4.0` becomes `"4"`, `4.5` stays `"4.5"`).
pub fn format_f64(value: f64) -> String {
    format!("{value}")
}
