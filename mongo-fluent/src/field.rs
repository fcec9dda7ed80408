use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use bson::Document;

use crate::error::{self, Result};
use crate::operator::Operator;
use crate::value::{Map, Value};

/// Used to pass one or many `(field, value)` pairs to a builder method.
///
/// Every builder accepts either a single pair or a collection of pairs, so the following calls
/// are equivalent:
///
/// ```
/// # fn doc() -> mongo_fluent::Result<()> {
/// use std::collections::BTreeMap;
///
/// use mongo_fluent::Query;
///
/// let mut query = Query::new();
/// query.set(("name", "foo"))?;
/// query.set([("name", "foo")])?;
/// query.set(vec![("name", "foo")])?;
///
/// let mut fields = BTreeMap::new();
/// fields.insert("name", "foo");
/// query.set(fields)?;
/// # Ok(())
/// # }
/// ```
pub trait IntoFields<V> {
    /// Converts `self` into an ordered list of field name and value pairs.
    fn into_fields(self) -> Vec<(String, V)>;
}

impl<K, T, V> IntoFields<V> for (K, T)
where
    K: Into<String>,
    T: Into<V>,
{
    fn into_fields(self) -> Vec<(String, V)> {
        vec![(self.0.into(), self.1.into())]
    }
}

impl<K, T, V> IntoFields<V> for Vec<(K, T)>
where
    K: Into<String>,
    T: Into<V>,
{
    fn into_fields(self) -> Vec<(String, V)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, T, V, const N: usize> IntoFields<V> for [(K, T); N]
where
    K: Into<String>,
    T: Into<V>,
{
    fn into_fields(self) -> Vec<(String, V)> {
        IntoIterator::into_iter(self)
            .map(|(k, v)| (k.into(), v.into()))
            .collect()
    }
}

impl<K, T, V> IntoFields<V> for BTreeMap<K, T>
where
    K: Into<String>,
    T: Into<V>,
{
    fn into_fields(self) -> Vec<(String, V)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl<K, T, V, S> IntoFields<V> for HashMap<K, T, S>
where
    K: Into<String>,
    T: Into<V>,
    S: BuildHasher,
{
    fn into_fields(self) -> Vec<(String, V)> {
        self.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
    }
}

impl IntoFields<Value> for Document {
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl IntoFields<Value> for Map {
    fn into_fields(self) -> Vec<(String, Value)> {
        self.into_iter().collect()
    }
}

// Top level constructs such as `or(..)` or `js(..)` are pushed as their operator keys.
impl IntoFields<Value> for Operator {
    fn into_fields(self) -> Vec<(String, Value)> {
        if matches!(self, Operator::Text(_)) {
            return vec![("$text".to_owned(), Value::Map(self.into_map()))];
        }
        self.into_map().into_iter().collect()
    }
}

/// Used to pass one or many field names to a builder method that takes no values.
pub trait FieldNames {
    /// Converts `self` into an ordered list of field names.
    fn into_names(self) -> Vec<String>;
}

impl FieldNames for () {
    fn into_names(self) -> Vec<String> {
        vec![]
    }
}

impl FieldNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_owned()]
    }
}

impl FieldNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl FieldNames for &String {
    fn into_names(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: Into<String>> FieldNames for Vec<S> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<S: Into<String>, const N: usize> FieldNames for [S; N] {
    fn into_names(self) -> Vec<String> {
        IntoIterator::into_iter(self).map(Into::into).collect()
    }
}

impl<S: Clone + Into<String>> FieldNames for &[S] {
    fn into_names(self) -> Vec<String> {
        self.iter().cloned().map(Into::into).collect()
    }
}

/// Collects and validates the pairs given to `operation`.
pub(crate) fn fields<V, F: IntoFields<V>>(
    operation: &'static str,
    fields: F,
) -> Result<Vec<(String, V)>> {
    let fields = fields.into_fields();
    if fields.is_empty() {
        return Err(error::validation(operation, "no fields were given"));
    }
    if fields.iter().any(|(name, _)| name.is_empty()) {
        return Err(error::validation(
            operation,
            "each field name must not be an empty string",
        ));
    }
    Ok(fields)
}

/// Collects and validates the names given to `operation`, an empty list is allowed.
pub(crate) fn names_or_none<F: FieldNames>(
    operation: &'static str,
    names: F,
) -> Result<Vec<String>> {
    let names = names.into_names();
    if names.iter().any(String::is_empty) {
        return Err(error::validation(
            operation,
            "each field name must not be an empty string",
        ));
    }
    Ok(names)
}

/// Collects and validates the names given to `operation`.
pub(crate) fn names<F: FieldNames>(operation: &'static str, names: F) -> Result<Vec<String>> {
    let names = names_or_none(operation, names)?;
    if names.is_empty() {
        return Err(error::validation(operation, "no fields were given"));
    }
    Ok(names)
}

/// Checks a single field name given to `operation`.
pub(crate) fn name(operation: &'static str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(error::validation(
            operation,
            "field name must not be an empty string",
        ));
    }
    Ok(())
}

/// Checks the collection name given to `operation`.
pub(crate) fn collection(operation: &'static str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(error::validation(
            operation,
            "specify a collection name to which the query will be applied",
        ));
    }
    Ok(())
}

/// Collects the list given to `operation`, which must hold at least one value.
pub(crate) fn non_empty<T, I>(operation: &'static str, list: I) -> Result<Vec<Value>>
where
    T: Into<Value>,
    I: IntoIterator<Item = T>,
{
    let list: Vec<Value> = list.into_iter().map(Into::into).collect();
    if list.is_empty() {
        return Err(error::validation(operation, "list must not be empty"));
    }
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Kind;

    #[test]
    fn non_empty_list() {
        assert_eq!(
            non_empty("is_in", [1, 2]).unwrap(),
            vec![Value::from(1), Value::from(2)]
        );
        let err = non_empty("pull_all", Vec::<i32>::new()).unwrap_err();
        assert_eq!(*err.kind(), Kind::Validation);
        assert_eq!(err.operation(), Some("pull_all"));
    }

    #[test]
    fn pair_into_fields() {
        let fields: Vec<(String, Value)> = ("a", 1).into_fields();
        assert_eq!(fields, vec![("a".to_owned(), Value::from(1))]);
    }

    #[test]
    fn array_keeps_order() {
        let fields: Vec<(String, Value)> = [("b", 1), ("a", 2)].into_fields();
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn empty_fields_rejected() {
        let err = fields::<Value, _>("set", Vec::<(&str, i32)>::new()).unwrap_err();
        assert_eq!(*err.kind(), Kind::Validation);
        assert_eq!(err.operation(), Some("set"));
    }

    #[test]
    fn empty_name_rejected() {
        let err = fields::<Value, _>("set", [("a", 1), ("", 2)]).unwrap_err();
        assert_eq!(*err.kind(), Kind::Validation);
    }

    #[test]
    fn names_from_many_shapes() {
        assert_eq!("a".into_names(), vec!["a"]);
        assert_eq!(["a", "b"].into_names(), vec!["a", "b"]);
        assert_eq!(vec!["a".to_owned()].into_names(), vec!["a"]);
        assert!(().into_names().is_empty());
    }

    #[test]
    fn names_rejects_empty() {
        assert!(names("unset", ()).is_err());
        assert!(names("unset", ["a", ""]).is_err());
        assert!(names_or_none("select", ()).unwrap().is_empty());
    }

    #[test]
    fn collection_name() {
        assert!(collection("get", "users").is_ok());
        let err = collection("get", " ").unwrap_err();
        assert_eq!(err.operation(), Some("get"));
    }
}
