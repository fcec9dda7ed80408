//! The query state accumulator.
//!
//! A [`Query`] collects the four clause maps of a MongoDB request (filter, update, projection
//! and sort) along with paging and per-call driver options. Builder methods merge into the
//! existing state: a map-like value given for a field that already has one is deep merged,
//! anything else replaces the previous value.
//!
//! # Examples
//!
//! ```
//! # fn doc() -> mongo_fluent::Result<()> {
//! use mongo_fluent::bson::doc;
//! use mongo_fluent::operator::{gte, lte};
//! use mongo_fluent::Query;
//!
//! let mut query = Query::new();
//! query
//!     .filter(("age", gte(18)))?
//!     .filter(("age", lte(65)))?
//!     .sort(("name", 1))?
//!     .limit(10)?;
//!
//! assert_eq!(query.wheres(), doc! { "age": { "$gte": 18, "$lte": 65 } });
//! # Ok(())
//! # }
//! ```
use bson::Document;
use mongodb::options::FindOptions;

use crate::error::{self, Result};
use crate::value::{map_into_document, merge_maps, Map, Value};

mod filter;
mod options;
mod select;
mod sort;
mod update;

pub use self::options::Options;
pub use self::sort::Order;
pub use self::update::PushOptions;

/// The limit used when none is set, `limit(0)` resets to it.
pub const DEFAULT_LIMIT: i64 = 999_999;

/// The query state accumulator.
#[derive(Clone, Debug)]
pub struct Query {
    selects: Map,
    wheres: Map,
    updates: Map,
    sorts: Map,
    limit: i64,
    offset: i64,
    upsert: bool,
    options: Options,
    debug: bool,
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    /// Constructs an empty `Query` which surfaces invalid arguments as errors.
    pub fn new() -> Self {
        Self::with_debug(true)
    }

    /// Constructs an empty `Query`.
    ///
    /// When `debug` is off, a builder call with invalid arguments is logged and ignored instead
    /// of returning an error, leaving the query untouched.
    pub fn with_debug(debug: bool) -> Self {
        Self {
            selects: Map::new(),
            wheres: Map::new(),
            updates: Map::new(),
            sorts: Map::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            upsert: false,
            options: Options::default(),
            debug,
        }
    }

    /// Sets whether invalid arguments are surfaced as errors.
    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Clears every clause, the paging and the per-call options.
    pub fn reset_query(&mut self) -> &mut Self {
        let debug = self.debug;
        *self = Self::with_debug(debug);
        self
    }

    /// Returns true when no clause, paging or upsert has been set.
    pub fn is_empty(&self) -> bool {
        self.selects.is_empty()
            && self.wheres.is_empty()
            && self.updates.is_empty()
            && self.sorts.is_empty()
            && self.limit == DEFAULT_LIMIT
            && self.offset == 0
            && !self.upsert
    }

    /// The filter document.
    pub fn wheres(&self) -> Document {
        map_into_document(self.wheres.clone())
    }

    /// The projection document.
    pub fn selects(&self) -> Document {
        map_into_document(self.selects.clone())
    }

    /// The update document, keyed by update operator.
    pub fn updates(&self) -> Document {
        map_into_document(self.updates.clone())
    }

    /// The sort document.
    pub fn sorts(&self) -> Document {
        map_into_document(self.sorts.clone())
    }

    /// The maximum number of documents to return.
    pub fn limit_count(&self) -> i64 {
        self.limit
    }

    /// The number of documents to skip.
    pub fn skip_count(&self) -> i64 {
        self.offset
    }

    /// Whether updates insert a document when nothing matches.
    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    /// The per-call driver options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Builds the options of a find request from the accumulated state.
    pub fn find_options(&self) -> FindOptions {
        let mut options = FindOptions::default();
        if !self.selects.is_empty() {
            options.projection = Some(self.selects());
        }
        if !self.sorts.is_empty() {
            options.sort = Some(self.sorts());
        }
        options.skip = Some(self.offset as u64);
        options.limit = Some(self.limit);
        options.read_concern = Some(self.options.read_concern.clone());
        options.selection_criteria = Some(self.options.selection_criteria.clone());
        options.batch_size = self.options.batch_size;
        options.max_time = self.options.max_time;
        options.hint = self.options.hint.clone();
        options.collation = self.options.collation.clone();
        options
    }

    // Runs a builder body, routing its failure through the debug policy.
    fn apply<F>(&mut self, body: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if let Err(e) = body(self) {
            error::report::<()>(self.debug, e)?;
        }
        Ok(self)
    }

    fn push_where(&mut self, field: String, value: Value) {
        push(&mut self.wheres, field, value);
    }

    fn push_select(&mut self, field: String, value: Value) {
        push(&mut self.selects, field, value);
    }

    fn push_sort(&mut self, field: String, value: Value) {
        push(&mut self.sorts, field, value);
    }

    fn push_update(&mut self, operator: &str, field: String, value: Value) {
        let mut fields = Map::new();
        fields.insert(field, value);
        push(&mut self.updates, operator.to_owned(), Value::Map(fields));
    }
}

// Merges `value` into `field`, creating the field when it is new.
fn push(map: &mut Map, field: String, value: Value) {
    let mut incoming = Map::new();
    incoming.insert(field, value);
    merge_maps(map, incoming);
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;

    use crate::operator::{gte, lte};

    #[test]
    fn new_query_is_empty() {
        let query = Query::new();
        assert!(query.is_empty());
        assert_eq!(query.limit_count(), DEFAULT_LIMIT);
        assert_eq!(query.skip_count(), 0);
    }

    #[test]
    fn operators_merge_on_same_field() {
        let mut query = Query::new();
        query.filter(("age", gte(18))).unwrap();
        query.filter(("age", lte(65))).unwrap();
        assert_eq!(query.wheres(), doc! { "age": { "$gte": 18, "$lte": 65 } });
    }

    #[test]
    fn scalar_replaces_on_same_field() {
        let mut query = Query::new();
        query.filter(("name", "foo")).unwrap();
        query.filter(("name", "bar")).unwrap();
        assert_eq!(query.wheres(), doc! { "name": "bar" });
    }

    #[test]
    fn updates_group_by_operator() {
        let mut query = Query::new();
        query.set(("a", 1)).unwrap();
        query.set(("b", 2)).unwrap();
        query.inc(("c", 1)).unwrap();
        assert_eq!(
            query.updates(),
            doc! { "$set": { "a": 1, "b": 2 }, "$inc": { "c": 1 } }
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut query = Query::new();
        query
            .filter(("a", 1))
            .unwrap()
            .select(["a"], ())
            .unwrap()
            .set_on_insert(("b", 1))
            .unwrap()
            .sort(("a", -1))
            .unwrap()
            .limit(5)
            .unwrap()
            .offset(5)
            .unwrap();
        assert!(query.is_upsert());

        query.reset_query();
        assert!(query.is_empty());
    }

    #[test]
    fn failed_call_leaves_state_untouched() {
        let mut query = Query::new();
        query.filter(("a", 1)).unwrap();
        assert!(query.filter([("b", 2), ("", 3)]).is_err());
        assert_eq!(query.wheres(), doc! { "a": 1 });
    }

    #[test]
    fn failed_call_is_ignored_without_debug() {
        let mut query = Query::with_debug(false);
        query.filter(("a", 1)).unwrap();
        assert!(query.filter(("", 3)).is_ok());
        assert_eq!(query.wheres(), doc! { "a": 1 });
    }

    #[test]
    fn find_options_follow_state() {
        let mut query = Query::new();
        query
            .select(["name"], ["_id"])
            .unwrap()
            .sort(("name", "desc"))
            .unwrap()
            .limit(3)
            .unwrap()
            .offset(6)
            .unwrap();
        let options = query.find_options();
        assert_eq!(options.projection, Some(doc! { "name": true, "_id": false }));
        assert_eq!(options.sort, Some(doc! { "name": -1 }));
        assert_eq!(options.limit, Some(3));
        assert_eq!(options.skip, Some(6));
    }
}
