use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};
use std::borrow::Cow;

use crate::node::MarkupNode;

/// Input accepted when constructing nodes or assigning into them.
///
/// Mirrors a dynamically typed document: scalars, ordered objects and
/// arrays, plus `Undefined`, which assignment treats as "leave the key
/// alone".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Build an object value, keeping the entry order.
    pub fn object<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array value.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Objects and arrays become child nodes; everything else is a scalar.
    pub fn is_structured(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Apply the assignment rule for a scalar slot.
    ///
    /// `Undefined` yields `None` (no write). `Null` is kept as-is. Anything
    /// whose text form is empty is replaced by `def_val`. Structured values
    /// are flattened to compact JSON text.
    pub(crate) fn into_scalar(self, def_val: &str) -> Option<Scalar> {
        let scalar = match self {
            Value::Undefined => return None,
            Value::Null => return Some(Scalar::Null),
            Value::Bool(b) => Scalar::Bool(b),
            Value::Number(n) => Scalar::Number(n),
            Value::String(s) => Scalar::String(s),
            structured => Scalar::String(structured.to_json().to_string()),
        };
        if scalar.to_text().is_empty() {
            Some(Scalar::String(def_val.to_string()))
        } else {
            Some(scalar)
        }
    }

    /// JSON view of this value. `Undefined` object entries are dropped and
    /// `Undefined` array items become `null`.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Undefined | Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => JsonValue::Number(n.clone()),
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(entries) => JsonValue::Object(
                entries
                    .iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f64> for Value {
    /// Non-finite floats have no text form and become `Null`.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

/// A leaf stored in a node slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Text form used for markup output and the empty-value check.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Null => Cow::Borrowed(""),
            Scalar::Bool(true) => Cow::Borrowed("true"),
            Scalar::Bool(false) => Cow::Borrowed("false"),
            Scalar::Number(n) => Cow::Owned(number_text(n)),
            Scalar::String(s) => Cow::Borrowed(s),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Scalar::Null => JsonValue::Null,
            Scalar::Bool(b) => JsonValue::Bool(*b),
            Scalar::Number(n) => JsonValue::Number(n.clone()),
            Scalar::String(s) => JsonValue::String(s.clone()),
        }
    }
}

/// Integral floats print without a fractional part (`1`, not `1.0`) and
/// without an exponent below 1e21.
fn number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.fract() == 0.0
    {
        if f.abs() < 1e15 {
            return (f as i64).to_string();
        }
        if f.abs() < 1e21 {
            return format!("{f}");
        }
    }
    n.to_string()
}

/// One slot in a node's element map.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Scalar(Scalar),
    Node(MarkupNode),
}

impl Element {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Element::Scalar(s) => Some(s),
            Element::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&MarkupNode> {
        match self {
            Element::Node(n) => Some(n),
            Element::Scalar(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut MarkupNode> {
        match self {
            Element::Node(n) => Some(n),
            Element::Scalar(_) => None,
        }
    }
}
