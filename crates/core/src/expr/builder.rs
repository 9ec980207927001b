//! Builders translating predicates and projections into store query
//! parameters.

use std::collections::HashMap;

use crate::attr::AttrValue;
use crate::schema::TableSchema;

use super::error::BuildError;
use super::predicate::{Predicate, ScalarValue};

/// Wire-level description of a scan produced by [`ExpressionBuilder`].
///
/// The expression strings reference placeholder tokens only; every token is
/// resolved through `names` or `values`. The structural `filter` is kept
/// alongside the rendered form so backends that evaluate predicates directly
/// (the in-memory store, client-side checks) need not parse the string.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub filter: Option<Predicate>,
    /// Projected field names, input order preserved, duplicates removed.
    /// `None` means "all fields".
    pub projection: Option<Vec<String>>,
    /// Placeholder to real field name (`#n0` -> `Year`).
    pub names: HashMap<String, String>,
    /// Value placeholder to literal (`:v0` -> `N("2014")`).
    pub values: HashMap<String, AttrValue>,
    pub filter_expression: Option<String>,
    pub projection_expression: Option<String>,
}

/// Wire-level description of an update produced by [`UpdateBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSpec {
    /// The assignments, structurally (field name -> new value).
    pub sets: Vec<(String, AttrValue)>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttrValue>,
    /// `SET #n0 = :v0, ...`
    pub update_expression: String,
}

/// Builds a [`QuerySpec`] from a filter predicate and a projection.
#[derive(Debug, Clone)]
pub struct ExpressionBuilder<'a> {
    schema: &'a TableSchema,
    filter: Option<Predicate>,
    projection: Vec<String>,
}

impl<'a> ExpressionBuilder<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            filter: None,
            projection: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_projection<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Renders the expression strings and placeholder maps.
    ///
    /// Placeholder names are only unique within the returned spec; the store
    /// cares about internal consistency, not about stability across calls.
    pub fn build(self) -> Result<QuerySpec, BuildError> {
        if self.filter.is_none() && self.projection.is_empty() {
            return Err(BuildError::EmptyBuilder);
        }

        let mut names = NamePool::new(self.schema);
        let mut values = ValuePool::default();

        let filter_expression = match &self.filter {
            Some(predicate) => Some(render_predicate(predicate, &mut names, &mut values)?),
            None => None,
        };

        let mut projected: Vec<String> = Vec::new();
        for field in &self.projection {
            if !projected.contains(field) {
                projected.push(field.clone());
            }
        }
        let projection_expression = if projected.is_empty() {
            None
        } else {
            let placeholders = projected
                .iter()
                .map(|field| names.placeholder(field))
                .collect::<Result<Vec<_>, _>>()?;
            Some(placeholders.join(", "))
        };

        Ok(QuerySpec {
            filter: self.filter,
            projection: if projected.is_empty() {
                None
            } else {
                Some(projected)
            },
            names: names.into_map(),
            values: values.into_map(),
            filter_expression,
            projection_expression,
        })
    }
}

/// Builds an [`UpdateSpec`] from `SET` assignments.
///
/// Key attributes are rejected: the composite key is immutable, replacing
/// it means delete + insert.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    schema: &'a TableSchema,
    sets: Vec<(String, ScalarValue)>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            sets: Vec::new(),
        }
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.sets.push((field.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<UpdateSpec, BuildError> {
        if self.sets.is_empty() {
            return Err(BuildError::EmptyBuilder);
        }

        let mut names = NamePool::new(self.schema);
        let mut values = ValuePool::default();
        let mut actions = Vec::with_capacity(self.sets.len());
        let mut sets = Vec::with_capacity(self.sets.len());

        for (field, value) in &self.sets {
            if self.schema.is_key_field(field) {
                return Err(BuildError::KeyAttribute {
                    field: field.clone(),
                });
            }
            let name = names.placeholder(field)?;
            let token = values.bind(value);
            actions.push(format!("{name} = {token}"));
            sets.push((field.clone(), value.to_attr()));
        }

        Ok(UpdateSpec {
            sets,
            names: names.into_map(),
            values: values.into_map(),
            update_expression: format!("SET {}", actions.join(", ")),
        })
    }
}

/// Allocates `#n<i>` placeholders, one per distinct field, validating each
/// field against the schema.
struct NamePool<'a> {
    schema: &'a TableSchema,
    tokens: HashMap<String, String>,
}

impl<'a> NamePool<'a> {
    fn new(schema: &'a TableSchema) -> Self {
        Self {
            schema,
            tokens: HashMap::new(),
        }
    }

    fn placeholder(&mut self, field: &str) -> Result<String, BuildError> {
        if !self.schema.has_field(field) {
            return Err(BuildError::UnknownField {
                field: field.to_string(),
            });
        }
        if let Some(token) = self.tokens.get(field) {
            return Ok(token.clone());
        }
        let token = format!("#n{}", self.tokens.len());
        self.tokens.insert(field.to_string(), token.clone());
        Ok(token)
    }

    fn into_map(self) -> HashMap<String, String> {
        self.tokens
            .into_iter()
            .map(|(field, token)| (token, field))
            .collect()
    }
}

/// Allocates `:v<i>` placeholders, one per bound literal.
#[derive(Default)]
struct ValuePool {
    values: HashMap<String, AttrValue>,
}

impl ValuePool {
    fn bind(&mut self, value: &ScalarValue) -> String {
        let token = format!(":v{}", self.values.len());
        self.values.insert(token.clone(), value.to_attr());
        token
    }

    fn into_map(self) -> HashMap<String, AttrValue> {
        self.values
    }
}

fn render_predicate(
    predicate: &Predicate,
    names: &mut NamePool<'_>,
    values: &mut ValuePool,
) -> Result<String, BuildError> {
    match predicate {
        Predicate::Compare { field, op, value } => {
            let name = names.placeholder(field)?;
            let token = values.bind(value);
            Ok(format!("{name} {} {token}", op.symbol()))
        }
        Predicate::And(children) => render_branch(children, " AND ", names, values),
        Predicate::Or(children) => render_branch(children, " OR ", names, values),
    }
}

fn render_branch(
    children: &[Predicate],
    separator: &str,
    names: &mut NamePool<'_>,
    values: &mut ValuePool,
) -> Result<String, BuildError> {
    if children.is_empty() {
        return Err(BuildError::EmptyPredicate);
    }
    let rendered = children
        .iter()
        .map(|child| {
            let inner = render_predicate(child, names, values)?;
            // Parenthesize nested branches so precedence is explicit.
            Ok(match child {
                Predicate::Compare { .. } => inner,
                _ => format!("({inner})"),
            })
        })
        .collect::<Result<Vec<_>, BuildError>>()?;
    Ok(rendered.join(separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrValue;
    use crate::schema::{movies_schema, FIELD_RATING, FIELD_TITLE, FIELD_YEAR};

    /// Extracts placeholder tokens (`#...` or `:...`) from an expression
    /// string.
    fn tokens(expression: &str, sigil: char) -> Vec<String> {
        expression
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '#' || c == ':'))
            .filter(|part| part.starts_with(sigil))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_single_comparison_filter() {
        let schema = movies_schema();
        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::greater_than_equal(FIELD_YEAR, 2014))
            .build()
            .unwrap();

        let filter = spec.filter_expression.unwrap();
        assert!(filter.contains(">="));

        let name_tokens = tokens(&filter, '#');
        let value_tokens = tokens(&filter, ':');
        assert_eq!(name_tokens.len(), 1);
        assert_eq!(value_tokens.len(), 1);
        assert_eq!(spec.names.get(&name_tokens[0]).unwrap(), FIELD_YEAR);
        assert_eq!(
            spec.values.get(&value_tokens[0]).unwrap(),
            &AttrValue::N("2014".to_string())
        );
    }

    #[test]
    fn test_every_referenced_token_resolves() {
        let schema = movies_schema();
        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::and(vec![
                Predicate::greater_than_equal(FIELD_YEAR, 2014),
                Predicate::or(vec![
                    Predicate::greater_than(FIELD_RATING, 4.0),
                    Predicate::equal(FIELD_TITLE, "Rush"),
                ]),
            ]))
            .with_projection([FIELD_TITLE, FIELD_YEAR, FIELD_RATING])
            .build()
            .unwrap();

        let mut referenced_names = Vec::new();
        let mut referenced_values = Vec::new();
        for expression in [
            spec.filter_expression.as_deref().unwrap(),
            spec.projection_expression.as_deref().unwrap(),
        ] {
            referenced_names.extend(tokens(expression, '#'));
            referenced_values.extend(tokens(expression, ':'));
        }

        for token in &referenced_names {
            assert!(spec.names.contains_key(token), "unresolved name {token}");
        }
        for token in &referenced_values {
            assert!(spec.values.contains_key(token), "unresolved value {token}");
        }

        // One entry per distinct field/literal, nothing dangling.
        assert_eq!(spec.names.len(), 3);
        assert_eq!(spec.values.len(), 3);
    }

    #[test]
    fn test_projection_preserves_order_and_dedupes() {
        let schema = movies_schema();
        let spec = ExpressionBuilder::new(&schema)
            .with_projection([FIELD_TITLE, FIELD_YEAR, FIELD_TITLE, FIELD_RATING])
            .build()
            .unwrap();

        assert_eq!(
            spec.projection.clone().unwrap(),
            vec![FIELD_TITLE, FIELD_YEAR, FIELD_RATING]
        );

        let expression = spec.projection_expression.unwrap();
        let placeholders = tokens(&expression, '#');
        assert_eq!(placeholders.len(), 3);
        assert_eq!(spec.names.get(&placeholders[0]).unwrap(), FIELD_TITLE);
        assert_eq!(spec.names.get(&placeholders[1]).unwrap(), FIELD_YEAR);
        assert_eq!(spec.names.get(&placeholders[2]).unwrap(), FIELD_RATING);
    }

    #[test]
    fn test_filter_and_projection_share_name_placeholders() {
        let schema = movies_schema();
        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::greater_than_equal(FIELD_YEAR, 2014))
            .with_projection([FIELD_YEAR])
            .build()
            .unwrap();

        // Same field, same token in both expressions.
        assert_eq!(spec.names.len(), 1);
        let filter = spec.filter_expression.unwrap();
        let projection = spec.projection_expression.unwrap();
        assert!(filter.contains(projection.as_str()));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let schema = movies_schema();
        let result = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::greater_than("Runtime", 90))
            .build();

        assert_eq!(
            result,
            Err(BuildError::UnknownField {
                field: "Runtime".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_projection_field_is_rejected() {
        let schema = movies_schema();
        let result = ExpressionBuilder::new(&schema)
            .with_projection(["Director"])
            .build();

        assert!(matches!(result, Err(BuildError::UnknownField { .. })));
    }

    #[test]
    fn test_empty_builder_is_rejected() {
        let schema = movies_schema();
        assert_eq!(
            ExpressionBuilder::new(&schema).build(),
            Err(BuildError::EmptyBuilder)
        );
    }

    #[test]
    fn test_empty_branch_is_rejected() {
        let schema = movies_schema();
        let result = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::and(vec![]))
            .build();

        assert_eq!(result, Err(BuildError::EmptyPredicate));
    }

    #[test]
    fn test_nested_branches_are_parenthesized() {
        let schema = movies_schema();
        let spec = ExpressionBuilder::new(&schema)
            .with_filter(Predicate::or(vec![
                Predicate::and(vec![
                    Predicate::greater_than_equal(FIELD_YEAR, 2014),
                    Predicate::greater_than(FIELD_RATING, 4.0),
                ]),
                Predicate::equal(FIELD_TITLE, "Rush"),
            ]))
            .build()
            .unwrap();

        let filter = spec.filter_expression.unwrap();
        assert!(filter.starts_with('('));
        assert!(filter.contains(") OR "));
        assert!(filter.contains(" AND "));
    }

    #[test]
    fn test_update_set_rating() {
        let schema = movies_schema();
        let update = UpdateBuilder::new(&schema)
            .set(FIELD_RATING, 2.4)
            .build()
            .unwrap();

        let name_tokens = tokens(&update.update_expression, '#');
        let value_tokens = tokens(&update.update_expression, ':');
        assert!(update.update_expression.starts_with("SET "));
        assert_eq!(update.names.get(&name_tokens[0]).unwrap(), FIELD_RATING);
        assert_eq!(
            update.values.get(&value_tokens[0]).unwrap(),
            &AttrValue::N("2.4".to_string())
        );
        assert_eq!(
            update.sets,
            vec![(FIELD_RATING.to_string(), AttrValue::N("2.4".to_string()))]
        );
    }

    #[test]
    fn test_update_rejects_key_attributes() {
        let schema = movies_schema();

        let result = UpdateBuilder::new(&schema).set(FIELD_YEAR, 1999).build();
        assert_eq!(
            result,
            Err(BuildError::KeyAttribute {
                field: FIELD_YEAR.to_string()
            })
        );

        let result = UpdateBuilder::new(&schema)
            .set(FIELD_TITLE, "Renamed")
            .build();
        assert!(matches!(result, Err(BuildError::KeyAttribute { .. })));
    }

    #[test]
    fn test_update_rejects_unknown_field() {
        let schema = movies_schema();
        let result = UpdateBuilder::new(&schema).set("Runtime", 90).build();
        assert!(matches!(result, Err(BuildError::UnknownField { .. })));
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let schema = movies_schema();
        assert_eq!(
            UpdateBuilder::new(&schema).build(),
            Err(BuildError::EmptyBuilder)
        );
    }
}
