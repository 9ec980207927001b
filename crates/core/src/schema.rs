//! Movie table schema (pure data).

/// Scalar attribute types the table declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Number,
    String,
}

/// A named attribute with its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub attribute_type: AttributeType,
}

impl FieldDef {
    pub fn new(name: &str, attribute_type: AttributeType) -> Self {
        Self {
            name: name.to_string(),
            attribute_type,
        }
    }
}

/// Table schema: composite primary key plus non-key attributes.
///
/// The expression builders validate every referenced field against this,
/// so a filter or update can never smuggle an unknown name into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub partition_key: FieldDef,
    pub sort_key: Option<FieldDef>,
    pub attributes: Vec<FieldDef>,
}

impl TableSchema {
    /// Looks up a field definition by name, keys included.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        if self.partition_key.name == name {
            return Some(&self.partition_key);
        }
        if let Some(sk) = &self.sort_key {
            if sk.name == name {
                return Some(sk);
            }
        }
        self.attributes.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Whether the field is part of the composite primary key.
    pub fn is_key_field(&self, name: &str) -> bool {
        self.partition_key.name == name
            || self.sort_key.as_ref().is_some_and(|sk| sk.name == name)
    }
}

// Attribute names as stored on the wire.
pub const FIELD_YEAR: &str = "Year";
pub const FIELD_TITLE: &str = "Title";
pub const FIELD_PLOT: &str = "Plot";
pub const FIELD_RATING: &str = "Rating";

/// Returns the canonical schema for the movies table.
/// This is a pure function - no I/O.
pub fn movies_schema() -> TableSchema {
    TableSchema {
        partition_key: FieldDef::new(FIELD_YEAR, AttributeType::Number),
        sort_key: Some(FieldDef::new(FIELD_TITLE, AttributeType::String)),
        attributes: vec![
            FieldDef::new(FIELD_PLOT, AttributeType::String),
            FieldDef::new(FIELD_RATING, AttributeType::Number),
        ],
    }
}
