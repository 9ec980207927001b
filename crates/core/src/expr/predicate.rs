//! Filter predicates over record fields.

use std::cmp::Ordering;

use crate::attr::{format_f64, AttrValue, AttributeMap};

/// A literal value in a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl ScalarValue {
    /// Wire representation as a tagged attribute value.
    pub fn to_attr(&self) -> AttrValue {
        match self {
            ScalarValue::Integer(v) => AttrValue::N(v.to_string()),
            ScalarValue::Float(v) => AttrValue::N(format_f64(*v)),
            ScalarValue::String(v) => AttrValue::S(v.clone()),
            ScalarValue::Bool(v) => AttrValue::Bool(*v),
        }
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Integer(i64::from(value))
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

/// Comparison operators the store understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    /// The operator symbol used inside expression strings.
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn eval(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

/// A filter predicate: a comparison leaf or an AND/OR tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        field: String,
        op: CompareOp,
        value: ScalarValue,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(
        field: impl Into<String>,
        op: CompareOp,
        value: impl Into<ScalarValue>,
    ) -> Self {
        Predicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn equal(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    /// `field > value`
    pub fn greater_than(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    /// `field >= value`
    pub fn greater_than_equal(field: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        Self::compare(field, CompareOp::Ge, value)
    }

    pub fn and(predicates: Vec<Predicate>) -> Self {
        Predicate::And(predicates)
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Predicate::Or(predicates)
    }

    /// Evaluates the predicate against an attribute map.
    ///
    /// A comparison against a missing attribute is false, matching the
    /// store's filter semantics.
    pub fn matches(&self, item: &AttributeMap) -> bool {
        match self {
            Predicate::Compare { field, op, value } => item
                .get(field)
                .map(|attr| compare(attr, *op, value))
                .unwrap_or(false),
            Predicate::And(predicates) => predicates.iter().all(|p| p.matches(item)),
            Predicate::Or(predicates) => predicates.iter().any(|p| p.matches(item)),
        }
    }
}

fn compare(attr: &AttrValue, op: CompareOp, value: &ScalarValue) -> bool {
    match (attr, value) {
        (AttrValue::N(raw), ScalarValue::Integer(i)) => compare_numeric(raw, op, *i as f64),
        (AttrValue::N(raw), ScalarValue::Float(f)) => compare_numeric(raw, op, *f),
        (AttrValue::S(s), ScalarValue::String(v)) => op.eval(s.as_str().cmp(v.as_str())),
        // Booleans have no ordering in the store; only equality applies.
        (AttrValue::Bool(b), ScalarValue::Bool(v)) => match op {
            CompareOp::Eq => b == v,
            CompareOp::Ne => b != v,
            _ => false,
        },
        _ => false,
    }
}

fn compare_numeric(raw: &str, op: CompareOp, rhs: f64) -> bool {
    raw.parse::<f64>()
        .ok()
        .and_then(|lhs| lhs.partial_cmp(&rhs))
        .map(|ordering| op.eval(ordering))
        .unwrap_or(false)
}
