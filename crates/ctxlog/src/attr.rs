//! # Attributes
//!
//! Key-value pairs carried by a logger handle or a single record.

use std::borrow::Cow;
use std::fmt;

/// Attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Value
{
    /// String value
    Str(String),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(f64),
    /// Boolean
    Bool(bool),
}

impl fmt::Display for Value
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<Value> for serde_json::Value
{
    fn from(value: Value) -> Self
    {
        match value {
            Value::Str(s) => Self::String(s),
            Value::Int(n) => Self::from(n),
            Value::Uint(n) => Self::from(n),
            // NaN and infinities have no JSON form
            Value::Float(n) => serde_json::Number::from_f64(n).map_or_else(|| Self::String(n.to_string()), Self::Number),
            Value::Bool(b) => Self::Bool(b),
        }
    }
}

impl From<&str> for Value
{
    fn from(value: &str) -> Self
    {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value
{
    fn from(value: String) -> Self
    {
        Self::Str(value)
    }
}

impl From<&String> for Value
{
    fn from(value: &String) -> Self
    {
        Self::Str(value.clone())
    }
}

impl From<bool> for Value
{
    fn from(value: bool) -> Self
    {
        Self::Bool(value)
    }
}

impl From<f32> for Value
{
    fn from(value: f32) -> Self
    {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value
{
    fn from(value: f64) -> Self
    {
        Self::Float(value)
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value
            {
                fn from(value: $ty) -> Self
                {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from_int!(Int, i64: i8, i16, i32, i64);
impl_from_int!(Uint, u64: u8, u16, u32, u64);

impl From<usize> for Value
{
    fn from(value: usize) -> Self
    {
        Self::Uint(value as u64)
    }
}

/// A key-value pair attached to a logger or a record
#[derive(Debug, Clone, PartialEq)]
pub struct Attr
{
    /// Attribute key
    pub key: String,
    /// Attribute value
    pub value: Value,
}

impl Attr
{
    /// Create a new attribute
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl<K, V> From<(K, V)> for Attr
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from((key, value): (K, V)) -> Self
    {
        Self::new(key, value)
    }
}

/// Keys written by the formatters themselves
const RESERVED_KEYS: [&str; 4] = ["time", "level", "source", "msg"];

/// Output key for an attribute; reserved keys are written as `attr.<key>`
fn output_key(key: &str) -> Cow<'_, str>
{
    if RESERVED_KEYS.contains(&key) {
        Cow::Owned(format!("attr.{key}"))
    } else {
        Cow::Borrowed(key)
    }
}

/// Merge handle attributes with record attributes
///
/// Order is attach order. Keys are compared after reserved keys are
/// prefixed, so `msg` and a literal `attr.msg` share one slot. A repeated
/// key keeps the position of its first occurrence and takes the value of
/// its last one.
pub(crate) fn flatten<'a>(handle: &'a [Attr], record: &'a [Attr]) -> Vec<(Cow<'a, str>, &'a Value)>
{
    let mut merged: Vec<(Cow<'a, str>, &'a Value)> = Vec::with_capacity(handle.len() + record.len());
    for attr in handle.iter().chain(record) {
        let key = output_key(&attr.key);
        match merged.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = &attr.value,
            None => merged.push((key, &attr.value)),
        }
    }
    merged
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_value_conversions()
    {
        assert_eq!(Value::from("a"), Value::Str("a".to_string()));
        assert_eq!(Value::from(-3_i32), Value::Int(-3));
        assert_eq!(Value::from(7_u16), Value::Uint(7));
        assert_eq!(Value::from(3_usize), Value::Uint(3));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(1.5_f64), Value::Float(1.5));
    }

    #[test]
    fn test_value_to_json()
    {
        assert_eq!(serde_json::Value::from(Value::Int(-1)), serde_json::json!(-1));
        assert_eq!(serde_json::Value::from(Value::Str("x".into())), serde_json::json!("x"));
        assert_eq!(serde_json::Value::from(Value::Float(f64::NAN)), serde_json::json!("NaN"));
    }

    #[test]
    fn test_flatten_last_value_wins_in_first_position()
    {
        let handle = vec![Attr::new("a", 1), Attr::new("b", 2)];
        let record = vec![Attr::new("c", 3), Attr::new("a", 9)];

        let merged = flatten(&handle, &record);
        let keys: Vec<&str> = merged.iter().map(|(key, _)| key.as_ref()).collect();

        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(merged[0].1, &Value::Int(9));
    }

    #[test]
    fn test_flatten_prefixes_reserved_keys_before_merging()
    {
        let handle = vec![Attr::new("msg", "a")];
        let record = vec![Attr::new("attr.msg", "b"), Attr::new("level", "x")];

        let merged = flatten(&handle, &record);
        let keys: Vec<&str> = merged.iter().map(|(key, _)| key.as_ref()).collect();

        assert_eq!(keys, ["attr.msg", "attr.level"]);
        assert_eq!(merged[0].1, &Value::from("b"));
    }

    #[test]
    fn test_attr_from_tuple()
    {
        let attr: Attr = ("user_id", 42_u64).into();
        assert_eq!(attr.key, "user_id");
        assert_eq!(attr.value, Value::Uint(42));
    }
}
