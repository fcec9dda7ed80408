//! Operator constructs.
//!
//! These are pure functions which build a single MongoDB operator, such as `$gte` or
//! `$elemMatch`, as a typed [`Operator`]. They can be handed to any filter, projection or update
//! builder of [`Query`](crate::Query), or nested inside each other.
//!
//! ```
//! # fn doc() -> mongo_fluent::Result<()> {
//! use mongo_fluent::operator::{gte, is_in, lte, or};
//! use mongo_fluent::Query;
//!
//! let mut query = Query::new();
//! query
//!     .filter(("age", gte(18)))?
//!     .filter(("age", lte(65)))?
//!     .filter(or([("role", is_in(vec!["admin", "owner"])?)])?)?;
//! # Ok(())
//! # }
//! ```
use bson::spec::BinarySubtype;
use bson::{Binary, Bson};

use crate::error::{self, Result};
use crate::field::{self, IntoFields};
use crate::value::{Map, Value};

/// A single MongoDB operator construct.
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    /// `{$eq: value}`
    Eq(Box<Value>),
    /// `{$ne: value}`
    Ne(Box<Value>),
    /// `{$gt: value}`
    Gt(Box<Value>),
    /// `{$gte: value}`
    Gte(Box<Value>),
    /// `{$lt: value}`
    Lt(Box<Value>),
    /// `{$lte: value}`
    Lte(Box<Value>),
    /// `{$gt: lower, $lt: upper}`, or `$gte`/`$lte` when inclusive.
    Between {
        /// The lower bound.
        lower: Box<Value>,
        /// The upper bound.
        upper: Box<Value>,
        /// Whether the bounds match themselves.
        inclusive: bool,
    },
    /// `{$in: [..]}`
    In(Vec<Value>),
    /// `{$nin: [..]}`
    Nin(Vec<Value>),
    /// `{$not: condition}`
    Not(Box<Value>),
    /// `{$or: [{field: condition}, ..]}` and friends.
    Logical(Logical, Vec<Map>),
    /// `{$exists: bool}`
    Exists(bool),
    /// `{$type: type}`
    Type(BsonType),
    /// `{$mod: [divisor, remainder]}`
    Mod {
        /// The divisor.
        divisor: Number,
        /// The expected remainder.
        remainder: Number,
    },
    /// `{$search: text, ..}`, the body of a `$text` filter.
    Text(TextSearch),
    /// `{$where: code}`
    Where(String),
    /// `{$all: [..]}`
    All(Vec<Value>),
    /// `{$elemMatch: {..}}`
    ElemMatch(Map),
    /// `{$size: len}`
    Size(i32),
    /// `{$bitsAllSet: mask}` and friends.
    Bits(BitTest, Bitmask),
    /// `{$slice: n}` or `{$slice: [skip, limit]}`
    Slice(Slice),
    /// `{$meta: "textScore"}`
    MetaTextScore,
    /// `{$each: [..]}` with the optional `$push` modifiers.
    Each {
        /// The values to add.
        values: Vec<Value>,
        /// `$slice` modifier.
        slice: Option<i32>,
        /// `$sort` modifier.
        sort: Option<Box<Value>>,
        /// `$position` modifier.
        position: Option<i32>,
    },
    /// `{$type: "date"}` or `{$type: "timestamp"}`, the body of a `$currentDate` update.
    CurrentDate(DateType),
    /// `{and: n}` and friends, the body of a `$bit` update.
    Bit(Bitwise, i64),
}

impl Operator {
    /// Renders the construct into its wire map.
    pub fn into_map(self) -> Map {
        let mut map = Map::new();
        match self {
            Operator::Eq(v) => single(&mut map, "$eq", *v),
            Operator::Ne(v) => single(&mut map, "$ne", *v),
            Operator::Gt(v) => single(&mut map, "$gt", *v),
            Operator::Gte(v) => single(&mut map, "$gte", *v),
            Operator::Lt(v) => single(&mut map, "$lt", *v),
            Operator::Lte(v) => single(&mut map, "$lte", *v),
            Operator::Between {
                lower,
                upper,
                inclusive,
            } => {
                let (lo, hi) = if inclusive {
                    ("$gte", "$lte")
                } else {
                    ("$gt", "$lt")
                };
                single(&mut map, lo, *lower);
                single(&mut map, hi, *upper);
            }
            Operator::In(list) => single(&mut map, "$in", Value::List(list)),
            Operator::Nin(list) => single(&mut map, "$nin", Value::List(list)),
            Operator::Not(v) => single(&mut map, "$not", *v),
            Operator::Logical(op, clauses) => {
                let clauses = clauses.into_iter().map(Value::Map).collect();
                single(&mut map, op.key(), Value::List(clauses))
            }
            Operator::Exists(b) => single(&mut map, "$exists", b.into()),
            Operator::Type(t) => single(&mut map, "$type", t.into()),
            Operator::Mod { divisor, remainder } => single(
                &mut map,
                "$mod",
                Value::List(vec![divisor.into(), remainder.into()]),
            ),
            Operator::Text(search) => search.render(&mut map),
            Operator::Where(code) => {
                single(&mut map, "$where", Value::Scalar(Bson::JavaScriptCode(code)))
            }
            Operator::All(list) => single(&mut map, "$all", Value::List(list)),
            Operator::ElemMatch(conditions) => {
                single(&mut map, "$elemMatch", Value::Map(conditions))
            }
            Operator::Size(len) => single(&mut map, "$size", len.into()),
            Operator::Bits(test, mask) => single(&mut map, test.key(), mask.into()),
            Operator::Slice(slice) => single(&mut map, "$slice", slice.into()),
            Operator::MetaTextScore => single(&mut map, "$meta", "textScore".into()),
            Operator::Each {
                values,
                slice,
                sort,
                position,
            } => {
                single(&mut map, "$each", Value::List(values));
                if let Some(slice) = slice {
                    single(&mut map, "$slice", slice.into());
                }
                if let Some(sort) = sort {
                    single(&mut map, "$sort", *sort);
                }
                if let Some(position) = position {
                    single(&mut map, "$position", position.into());
                }
            }
            Operator::CurrentDate(t) => single(&mut map, "$type", t.as_str().into()),
            Operator::Bit(op, n) => single(&mut map, op.as_str(), n.into()),
        }
        map
    }
}

fn single(map: &mut Map, key: &str, value: Value) {
    map.insert(key.to_owned(), value);
}

impl From<Operator> for Bson {
    fn from(op: Operator) -> Self {
        Value::Operator(op).into_bson()
    }
}

/// The logical operator joining a list of clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Logical {
    /// `$or`
    Or,
    /// `$and`
    And,
    /// `$nor`
    Nor,
}

impl Logical {
    /// The operator key, e.g. `$or`.
    pub fn key(self) -> &'static str {
        match self {
            Logical::Or => "$or",
            Logical::And => "$and",
            Logical::Nor => "$nor",
        }
    }
}

/// A numeric value for arithmetic operators, such as `$inc` or `$mod`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// A 32 bit integer.
    Int32(i32),
    /// A 64 bit integer.
    Int64(i64),
    /// A double.
    Double(f64),
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int32(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int64(n)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::Int64(n as i64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::Double(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Double(n)
    }
}

impl From<Number> for Bson {
    fn from(n: Number) -> Self {
        match n {
            Number::Int32(n) => Bson::Int32(n),
            Number::Int64(n) => Bson::Int64(n),
            Number::Double(n) => Bson::Double(n),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Scalar(n.into())
    }
}

/// A BSON type given to `$type`, either by number or by alias.
#[derive(Clone, Debug, PartialEq)]
pub enum BsonType {
    /// The numeric BSON type, e.g. `2` for strings.
    Number(i32),
    /// The string alias, e.g. `"string"`.
    Alias(String),
}

impl From<i32> for BsonType {
    fn from(n: i32) -> Self {
        BsonType::Number(n)
    }
}

impl From<&str> for BsonType {
    fn from(alias: &str) -> Self {
        BsonType::Alias(alias.to_owned())
    }
}

impl From<String> for BsonType {
    fn from(alias: String) -> Self {
        BsonType::Alias(alias)
    }
}

impl From<BsonType> for Value {
    fn from(t: BsonType) -> Self {
        match t {
            BsonType::Number(n) => n.into(),
            BsonType::Alias(alias) => alias.into(),
        }
    }
}

/// The bitwise query operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitTest {
    /// `$bitsAllSet`
    AllSet,
    /// `$bitsAnySet`
    AnySet,
    /// `$bitsAllClear`
    AllClear,
    /// `$bitsAnyClear`
    AnyClear,
}

impl BitTest {
    fn key(self) -> &'static str {
        match self {
            BitTest::AllSet => "$bitsAllSet",
            BitTest::AnySet => "$bitsAnySet",
            BitTest::AllClear => "$bitsAllClear",
            BitTest::AnyClear => "$bitsAnyClear",
        }
    }

    fn operation(self) -> &'static str {
        match self {
            BitTest::AllSet => "bits_all_set",
            BitTest::AnySet => "bits_any_set",
            BitTest::AllClear => "bits_all_clear",
            BitTest::AnyClear => "bits_any_clear",
        }
    }
}

/// The mask tested by the bitwise query operators.
#[derive(Clone, Debug, PartialEq)]
pub enum Bitmask {
    /// A numeric bitmask.
    Mask(i64),
    /// A list of bit positions.
    Positions(Vec<u32>),
    /// A binary bitmask.
    Binary(Vec<u8>),
}

impl From<i32> for Bitmask {
    fn from(mask: i32) -> Self {
        Bitmask::Mask(mask as i64)
    }
}

impl From<i64> for Bitmask {
    fn from(mask: i64) -> Self {
        Bitmask::Mask(mask)
    }
}

impl From<Vec<u32>> for Bitmask {
    fn from(positions: Vec<u32>) -> Self {
        Bitmask::Positions(positions)
    }
}

impl<const N: usize> From<[u32; N]> for Bitmask {
    fn from(positions: [u32; N]) -> Self {
        Bitmask::Positions(positions.to_vec())
    }
}

impl From<Binary> for Bitmask {
    fn from(binary: Binary) -> Self {
        Bitmask::Binary(binary.bytes)
    }
}

impl From<Bitmask> for Value {
    fn from(mask: Bitmask) -> Self {
        match mask {
            Bitmask::Mask(n) => n.into(),
            Bitmask::Positions(p) => Value::List(p.into_iter().map(Value::from).collect()),
            Bitmask::Binary(bytes) => Value::Scalar(Bson::Binary(Binary {
                subtype: BinarySubtype::Generic,
                bytes,
            })),
        }
    }
}

/// The argument of a `$slice` projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slice {
    /// Return the first `n` elements, or the last `n` when negative.
    Count(i32),
    /// Skip and limit.
    Range(i32, i32),
}

impl From<i32> for Slice {
    fn from(n: i32) -> Self {
        Slice::Count(n)
    }
}

impl From<(i32, i32)> for Slice {
    fn from((skip, limit): (i32, i32)) -> Self {
        Slice::Range(skip, limit)
    }
}

impl From<[i32; 2]> for Slice {
    fn from([skip, limit]: [i32; 2]) -> Self {
        Slice::Range(skip, limit)
    }
}

impl From<Slice> for Value {
    fn from(slice: Slice) -> Self {
        match slice {
            Slice::Count(n) => n.into(),
            Slice::Range(skip, limit) => Value::List(vec![skip.into(), limit.into()]),
        }
    }
}

/// The date type set by `$currentDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateType {
    /// A BSON date.
    Date,
    /// A BSON timestamp.
    Timestamp,
}

impl DateType {
    fn as_str(self) -> &'static str {
        match self {
            DateType::Date => "date",
            DateType::Timestamp => "timestamp",
        }
    }
}

/// The operation applied by a `$bit` update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bitwise {
    /// Bitwise `and`.
    And,
    /// Bitwise `or`.
    Or,
    /// Bitwise `xor`.
    Xor,
}

impl Bitwise {
    fn as_str(self) -> &'static str {
        match self {
            Bitwise::And => "and",
            Bitwise::Or => "or",
            Bitwise::Xor => "xor",
        }
    }
}

/// Options for a `$text` search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextOptions {
    /// The language that determines the stop words and the stemmer, blank is ignored.
    pub language: Option<String>,
    /// Enables case sensitive matching.
    pub case_sensitive: Option<bool>,
    /// Enables diacritic sensitive matching.
    pub diacritic_sensitive: Option<bool>,
}

/// The body of a `$text` filter.
#[derive(Clone, Debug, PartialEq)]
pub struct TextSearch {
    search: String,
    options: TextOptions,
}

impl TextSearch {
    fn render(self, map: &mut Map) {
        single(map, "$search", self.search.into());
        if let Some(language) = self.options.language {
            let language = language.trim();
            if !language.is_empty() {
                single(map, "$language", language.into());
            }
        }
        if let Some(case) = self.options.case_sensitive {
            single(map, "$caseSensitive", case.into());
        }
        if let Some(diacritic) = self.options.diacritic_sensitive {
            single(map, "$diacriticSensitive", diacritic.into());
        }
    }
}

/// A case insensitive, fully anchored regular expression over an escaped literal.
///
/// Built with [`regex`], rendered as a BSON regular expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    literal: String,
    flags: String,
    anchor_start: bool,
    anchor_end: bool,
}

impl Pattern {
    /// Sets the regular expression flags, `i` by default.
    pub fn flags(mut self, flags: &str) -> Self {
        self.flags = flags.to_owned();
        self
    }

    /// Anchors the expression at the start of the value, enabled by default.
    pub fn anchor_start(mut self, enable: bool) -> Self {
        self.anchor_start = enable;
        self
    }

    /// Anchors the expression at the end of the value, enabled by default.
    pub fn anchor_end(mut self, enable: bool) -> Self {
        self.anchor_end = enable;
        self
    }
}

impl From<&str> for Pattern {
    fn from(literal: &str) -> Self {
        regex(literal)
    }
}

impl From<String> for Pattern {
    fn from(literal: String) -> Self {
        regex(&literal)
    }
}

impl From<Pattern> for bson::Regex {
    fn from(p: Pattern) -> Self {
        let mut pattern = ::regex::escape(&p.literal);
        if p.anchor_start {
            pattern.insert(0, '^');
        }
        if p.anchor_end {
            pattern.push('$');
        }
        bson::Regex {
            pattern,
            options: p.flags,
        }
    }
}

impl From<Pattern> for Value {
    fn from(p: Pattern) -> Self {
        Value::Scalar(Bson::RegularExpression(p.into()))
    }
}

// Comparison

/// Matches values equal to `value`.
pub fn eq<V: Into<Value>>(value: V) -> Operator {
    Operator::Eq(Box::new(value.into()))
}

/// Matches values not equal to `value`.
pub fn ne<V: Into<Value>>(value: V) -> Operator {
    Operator::Ne(Box::new(value.into()))
}

/// Matches values greater than `value`.
pub fn gt<V: Into<Value>>(value: V) -> Operator {
    Operator::Gt(Box::new(value.into()))
}

/// Matches values greater than or equal to `value`.
pub fn gte<V: Into<Value>>(value: V) -> Operator {
    Operator::Gte(Box::new(value.into()))
}

/// Matches values less than `value`.
pub fn lt<V: Into<Value>>(value: V) -> Operator {
    Operator::Lt(Box::new(value.into()))
}

/// Matches values less than or equal to `value`.
pub fn lte<V: Into<Value>>(value: V) -> Operator {
    Operator::Lte(Box::new(value.into()))
}

/// Matches values strictly between `lower` and `upper`.
pub fn between<L: Into<Value>, U: Into<Value>>(lower: L, upper: U) -> Operator {
    Operator::Between {
        lower: Box::new(lower.into()),
        upper: Box::new(upper.into()),
        inclusive: false,
    }
}

/// Matches values between `lower` and `upper`, bounds included.
pub fn between_equal<L: Into<Value>, U: Into<Value>>(lower: L, upper: U) -> Operator {
    Operator::Between {
        lower: Box::new(lower.into()),
        upper: Box::new(upper.into()),
        inclusive: true,
    }
}

/// Matches values outside of `lower` and `upper`, bounds included.
pub fn not_between<L: Into<Value>, U: Into<Value>>(lower: L, upper: U) -> Operator {
    not(between(lower, upper))
}

/// Matches values outside of `lower` and `upper`, bounds excluded.
pub fn not_between_equal<L: Into<Value>, U: Into<Value>>(lower: L, upper: U) -> Operator {
    not(between_equal(lower, upper))
}

/// Matches any of the values in `list`.
///
/// # Errors
///
/// This function errors if `list` is empty.
pub fn is_in<T, I>(list: I) -> Result<Operator>
where
    T: Into<Value>,
    I: IntoIterator<Item = T>,
{
    Ok(Operator::In(field::non_empty("is_in", list)?))
}

/// Matches none of the values in `list`.
///
/// # Errors
///
/// This function errors if `list` is empty.
pub fn not_in<T, I>(list: I) -> Result<Operator>
where
    T: Into<Value>,
    I: IntoIterator<Item = T>,
{
    Ok(Operator::Nin(field::non_empty("not_in", list)?))
}

// Logical

fn logical<F: IntoFields<Value>>(
    operation: &'static str,
    op: Logical,
    conditions: F,
) -> Result<Operator> {
    let clauses = field::fields(operation, conditions)?
        .into_iter()
        .map(|(k, v)| {
            let mut clause = Map::new();
            clause.insert(k, v);
            clause
        })
        .collect();
    Ok(Operator::Logical(op, clauses))
}

/// Matches documents satisfying any of the `conditions`, one clause per field.
///
/// # Errors
///
/// This function errors if `conditions` is empty or has an empty field name.
pub fn or<F: IntoFields<Value>>(conditions: F) -> Result<Operator> {
    logical("or", Logical::Or, conditions)
}

/// Matches documents satisfying all of the `conditions`, one clause per field.
///
/// # Errors
///
/// This function errors if `conditions` is empty or has an empty field name.
pub fn and<F: IntoFields<Value>>(conditions: F) -> Result<Operator> {
    logical("and", Logical::And, conditions)
}

/// Matches documents satisfying none of the `conditions`, one clause per field.
///
/// # Errors
///
/// This function errors if `conditions` is empty or has an empty field name.
pub fn nor<F: IntoFields<Value>>(conditions: F) -> Result<Operator> {
    logical("nor", Logical::Nor, conditions)
}

/// Inverts `condition`.
pub fn not<V: Into<Value>>(condition: V) -> Operator {
    Operator::Not(Box::new(condition.into()))
}

// Element

/// Matches documents that have (or do not have) the field.
pub fn exists(exists: bool) -> Operator {
    Operator::Exists(exists)
}

/// Matches values of the given BSON type.
///
/// # Errors
///
/// This function errors if a string alias is empty.
pub fn of_type<T: Into<BsonType>>(t: T) -> Result<Operator> {
    match t.into() {
        BsonType::Alias(alias) if alias.trim().is_empty() => Err(error::validation(
            "of_type",
            "type must be a BSON type number or a non empty alias",
        )),
        t => Ok(Operator::Type(t)),
    }
}

// Evaluation

/// Matches values where `value % divisor == remainder`.
pub fn modulo<D: Into<Number>, R: Into<Number>>(divisor: D, remainder: R) -> Operator {
    Operator::Mod {
        divisor: divisor.into(),
        remainder: remainder.into(),
    }
}

/// Builds a regular expression matching the literal text `literal`.
///
/// The literal is escaped, the expression is case insensitive and anchored at both ends unless
/// changed on the returned [`Pattern`].
pub fn regex(literal: &str) -> Pattern {
    Pattern {
        literal: literal.to_owned(),
        flags: "i".to_owned(),
        anchor_start: true,
        anchor_end: true,
    }
}

/// Builds the body of a `$text` search.
///
/// # Errors
///
/// This function errors if `search` is empty.
pub fn text(search: &str, options: TextOptions) -> Result<Operator> {
    if search.is_empty() {
        return Err(error::validation(
            "text",
            "search text must not be an empty string",
        ));
    }
    Ok(Operator::Text(TextSearch {
        search: search.to_owned(),
        options,
    }))
}

/// Matches documents with a JavaScript expression.
///
/// # Errors
///
/// This function errors if `code` is empty.
pub fn js(code: &str) -> Result<Operator> {
    if code.trim().is_empty() {
        return Err(error::validation(
            "js",
            "javascript code must not be an empty string",
        ));
    }
    Ok(Operator::Where(code.to_owned()))
}

// Array

/// Matches arrays that contain every value of `list`.
///
/// # Errors
///
/// This function errors if `list` is empty.
pub fn all<T, I>(list: I) -> Result<Operator>
where
    T: Into<Value>,
    I: IntoIterator<Item = T>,
{
    Ok(Operator::All(field::non_empty("all", list)?))
}

/// Matches arrays with at least one element satisfying every condition.
///
/// # Errors
///
/// This function errors if `conditions` is empty or has an empty field name.
pub fn elem_match<F: IntoFields<Value>>(conditions: F) -> Result<Operator> {
    let conditions = field::fields("elem_match", conditions)?;
    Ok(Operator::ElemMatch(conditions.into_iter().collect()))
}

/// Matches arrays with exactly `len` elements.
pub fn size(len: i32) -> Operator {
    Operator::Size(len)
}

// Bitwise

fn bits<M: Into<Bitmask>>(test: BitTest, mask: M) -> Result<Operator> {
    let mask = mask.into();
    let empty = match mask {
        Bitmask::Mask(_) => false,
        Bitmask::Positions(ref p) => p.is_empty(),
        Bitmask::Binary(ref b) => b.is_empty(),
    };
    if empty {
        return Err(error::validation(
            test.operation(),
            "bitmask must be a number, a non empty position list or a non empty binary",
        ));
    }
    Ok(Operator::Bits(test, mask))
}

/// Matches values where all of the bits in `mask` are set.
///
/// # Errors
///
/// This function errors if the position list or binary mask is empty.
pub fn bits_all_set<M: Into<Bitmask>>(mask: M) -> Result<Operator> {
    bits(BitTest::AllSet, mask)
}

/// Matches values where any of the bits in `mask` are set.
///
/// # Errors
///
/// This function errors if the position list or binary mask is empty.
pub fn bits_any_set<M: Into<Bitmask>>(mask: M) -> Result<Operator> {
    bits(BitTest::AnySet, mask)
}

/// Matches values where all of the bits in `mask` are clear.
///
/// # Errors
///
/// This function errors if the position list or binary mask is empty.
pub fn bits_all_clear<M: Into<Bitmask>>(mask: M) -> Result<Operator> {
    bits(BitTest::AllClear, mask)
}

/// Matches values where any of the bits in `mask` are clear.
///
/// # Errors
///
/// This function errors if the position list or binary mask is empty.
pub fn bits_any_clear<M: Into<Bitmask>>(mask: M) -> Result<Operator> {
    bits(BitTest::AnyClear, mask)
}

// Projection

/// Limits the number of array elements a projection returns.
pub fn slice<S: Into<Slice>>(slice: S) -> Operator {
    Operator::Slice(slice.into())
}

/// The text search score.
pub fn meta_text_score() -> Operator {
    Operator::MetaTextScore
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;

    use crate::error::Kind;

    fn render(op: Operator) -> Bson {
        op.into()
    }

    #[test]
    fn comparison() {
        assert_eq!(render(eq(5)), Bson::Document(doc! { "$eq": 5 }));
        assert_eq!(render(ne("a")), Bson::Document(doc! { "$ne": "a" }));
        assert_eq!(render(gt(1.5)), Bson::Document(doc! { "$gt": 1.5 }));
        assert_eq!(
            render(between(1, 10)),
            Bson::Document(doc! { "$gt": 1, "$lt": 10 })
        );
        assert_eq!(
            render(between_equal(1, 10)),
            Bson::Document(doc! { "$gte": 1, "$lte": 10 })
        );
    }

    #[test]
    fn not_between_negates() {
        assert_eq!(
            render(not_between(1, 10)),
            Bson::Document(doc! { "$not": { "$gt": 1, "$lt": 10 } })
        );
        assert_eq!(
            render(not_between_equal(1, 10)),
            Bson::Document(doc! { "$not": { "$gte": 1, "$lte": 10 } })
        );
    }

    #[test]
    fn lists() {
        assert_eq!(
            render(is_in(vec![1, 2]).unwrap()),
            Bson::Document(doc! { "$in": [1, 2] })
        );
        assert_eq!(
            render(not_in(vec!["a"]).unwrap()),
            Bson::Document(doc! { "$nin": ["a"] })
        );
        let err = is_in(Vec::<i32>::new()).unwrap_err();
        assert_eq!(*err.kind(), Kind::Validation);
        assert_eq!(err.operation(), Some("is_in"));
        assert!(all(Vec::<i32>::new()).is_err());
    }

    #[test]
    fn logical_clauses() {
        let op = or([("a", Value::from(1)), ("b", Value::from(gt(2)))]).unwrap();
        assert_eq!(
            render(op),
            Bson::Document(doc! { "$or": [{ "a": 1 }, { "b": { "$gt": 2 } }] })
        );
        assert!(nor(Vec::<(&str, i32)>::new()).is_err());
        assert!(and([("", 1)]).is_err());
    }

    #[test]
    fn element() {
        assert_eq!(render(exists(true)), Bson::Document(doc! { "$exists": true }));
        assert_eq!(
            render(of_type("string").unwrap()),
            Bson::Document(doc! { "$type": "string" })
        );
        assert_eq!(render(of_type(2).unwrap()), Bson::Document(doc! { "$type": 2 }));
        assert!(of_type("").is_err());
    }

    #[test]
    fn regex_escapes_and_anchors() {
        let re: bson::Regex = regex("a.b").into();
        assert_eq!(re.pattern, "^a\\.b$");
        assert_eq!(re.options, "i");

        let re: bson::Regex = regex("ab").flags("").anchor_start(false).into();
        assert_eq!(re.pattern, "ab$");
        assert_eq!(re.options, "");
    }

    #[test]
    fn text_options() {
        let op = text(
            "coffee",
            TextOptions {
                language: Some(" en ".to_owned()),
                case_sensitive: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            render(op),
            Bson::Document(doc! { "$search": "coffee", "$language": "en", "$caseSensitive": true })
        );
        assert!(text("", TextOptions::default()).is_err());
    }

    #[test]
    fn javascript() {
        let op = js("this.a > 1").unwrap();
        assert_eq!(
            render(op),
            Bson::Document(doc! { "$where": Bson::JavaScriptCode("this.a > 1".to_owned()) })
        );
        assert!(js(" ").is_err());
    }

    #[test]
    fn bitwise() {
        assert_eq!(
            render(bits_all_set(5).unwrap()),
            Bson::Document(doc! { "$bitsAllSet": 5_i64 })
        );
        assert_eq!(
            render(bits_any_clear([1, 5]).unwrap()),
            Bson::Document(doc! { "$bitsAnyClear": [1_i64, 5_i64] })
        );
        let err = bits_any_set(Vec::<u32>::new()).unwrap_err();
        assert_eq!(err.operation(), Some("bits_any_set"));
    }

    #[test]
    fn projection() {
        assert_eq!(render(slice(5)), Bson::Document(doc! { "$slice": 5 }));
        assert_eq!(
            render(slice((10, 5))),
            Bson::Document(doc! { "$slice": [10, 5] })
        );
        assert_eq!(
            render(meta_text_score()),
            Bson::Document(doc! { "$meta": "textScore" })
        );
    }

    #[test]
    fn elem_match_requires_conditions() {
        let op = elem_match([("score", gte(80))]).unwrap();
        assert_eq!(
            render(op),
            Bson::Document(doc! { "$elemMatch": { "score": { "$gte": 80 } } })
        );
        assert!(elem_match(Vec::<(&str, i32)>::new()).is_err());
    }
}
