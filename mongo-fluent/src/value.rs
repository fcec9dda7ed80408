use std::collections::{BTreeMap, HashMap};
use std::convert::TryFrom;
use std::hash::BuildHasher;

use bson::oid::ObjectId;
use bson::{Binary, Bson, Document};
use indexmap::IndexMap;

use crate::operator::Operator;

/// An insertion ordered map of field paths to values.
pub type Map = IndexMap<String, Value>;

/// A value held by the query accumulator.
///
/// This is the typed replacement for loosely nested maps: leaves are plain BSON scalars, lists
/// and maps nest other values, and operator constructs are kept as their named variant until
/// they are rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A BSON leaf (string, number, bool, date, regex, ...).
    Scalar(Bson),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested map of field names to values.
    Map(Map),
    /// A named operator construct such as `$gt` or `$elemMatch`.
    Operator(Operator),
}

impl Value {
    /// The BSON `null` value.
    pub fn null() -> Self {
        Value::Scalar(Bson::Null)
    }

    /// Returns true for values that merge key by key: maps and operator constructs.
    pub fn is_map_like(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Operator(_))
    }

    /// Returns the nested map if this value is a `Value::Map`.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the BSON leaf if this value is a `Value::Scalar`.
    pub fn as_scalar(&self) -> Option<&Bson> {
        match self {
            Value::Scalar(b) => Some(b),
            _ => None,
        }
    }

    /// Converts map-like values into their map form, handing any other value back untouched.
    pub fn into_map(self) -> Result<Map, Value> {
        match self {
            Value::Map(map) => Ok(map),
            Value::Operator(op) => Ok(op.into_map()),
            other => Err(other),
        }
    }

    /// Merges `incoming` over this value.
    ///
    /// Two map-like values are merged recursively: keys of `incoming` override the same keys of
    /// `self` and disjoint keys from both are kept. In every other case `incoming` wins.
    pub fn merge(self, incoming: Value) -> Value {
        if !(self.is_map_like() && incoming.is_map_like()) {
            return incoming;
        }
        match (self.into_map(), incoming.into_map()) {
            (Ok(mut base), Ok(over)) => {
                merge_maps(&mut base, over);
                Value::Map(base)
            }
            (_, Ok(over)) => Value::Map(over),
            (_, Err(over)) => over,
        }
    }

    /// Renders the value into BSON, expanding operator constructs.
    pub fn into_bson(self) -> Bson {
        match self {
            Value::Scalar(b) => b,
            Value::List(list) => Bson::Array(list.into_iter().map(Value::into_bson).collect()),
            Value::Map(map) => Bson::Document(map_into_document(map)),
            Value::Operator(op) => Bson::Document(map_into_document(op.into_map())),
        }
    }
}

/// Deep merges `incoming` into `base` with override semantics.
pub fn merge_maps(base: &mut Map, incoming: Map) {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::replace(existing, Value::null());
                *existing = current.merge(value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
}

/// Renders a map into a BSON `Document`, keeping its order.
pub fn map_into_document(map: Map) -> Document {
    let mut doc = Document::new();
    for (key, value) in map {
        doc.insert(key, value.into_bson());
    }
    doc
}

impl From<Value> for Bson {
    fn from(value: Value) -> Self {
        value.into_bson()
    }
}

impl From<Bson> for Value {
    fn from(b: Bson) -> Self {
        match b {
            Bson::Array(list) => Value::List(list.into_iter().map(Value::from).collect()),
            Bson::Document(doc) => Value::from(doc),
            other => Value::Scalar(other),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Map(doc.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<Operator> for Value {
    fn from(op: Operator) -> Self {
        Value::Operator(op)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(list: Vec<T>) -> Self {
        Value::List(list.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::null(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<Value>, S: BuildHasher> From<HashMap<K, V, S>> for Value {
    fn from(map: HashMap<K, V, S>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// Scalars the bson crate already knows how to convert.
macro_rules! scalar_from {
    ($source:ty) => {
        impl From<$source> for Value {
            fn from(a: $source) -> Self {
                Value::Scalar(a.into())
            }
        }
    };
}
scalar_from!(&str);
scalar_from!(String);
scalar_from!(bool);
scalar_from!(f32);
scalar_from!(f64);
scalar_from!(i32);
scalar_from!(i64);
scalar_from!(ObjectId);
scalar_from!(Binary);
scalar_from!(bson::Regex);
scalar_from!(bson::DateTime);
scalar_from!(bson::Timestamp);

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Scalar(Bson::String(s.clone()))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Scalar(Bson::String(c.into()))
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Scalar(Bson::Int32(value as i32))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Scalar(Bson::Int32(value as i32))
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Scalar(Bson::Int32(value as i32))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Scalar(Bson::Int32(value as i32))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Scalar(Bson::Int64(value as i64))
    }
}

// BSON has no unsigned 64-bit integer, values past `i64::MAX` become doubles.
impl From<u64> for Value {
    fn from(value: u64) -> Self {
        let bson = i64::try_from(value)
            .map(Bson::Int64)
            .unwrap_or(Bson::Double(value as f64));
        Value::Scalar(bson)
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(dt: chrono::DateTime<chrono::Utc>) -> Self {
        Value::Scalar(Bson::DateTime(bson::DateTime::from_chrono(dt)))
    }
}
