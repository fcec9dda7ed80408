//! # Mongo Fluent
//!
//! The `mongo_fluent` crate is a fluent query builder on top of the official `bson` & `mongodb`
//! crates.
//!
//! It provides the following:
//!
//! - A [query accumulator][query] whose builder calls deep merge into the filter, update,
//!   projection and sort of the next request
//! - [Operator constructs][operator] for every filter, projection and update operator
//! - A synchronous [`Client`] executing the accumulated query
//! - [Connection string][connection] parsing and building
//! - Layered [configuration][config] from defaults, TOML files and explicit overrides
//!
//! ## Building queries
//!
//! Builder calls on the same field merge when both values are map-like, so range conditions can
//! be built up one bound at a time.
//!
//! ```
//! # fn doc() -> mongo_fluent::Result<()> {
//! use mongo_fluent::bson::doc;
//! use mongo_fluent::operator::{gte, is_in, lte, or};
//! use mongo_fluent::{Query, Value};
//!
//! let mut query = Query::new();
//! query
//!     .filter(("age", gte(18)))?
//!     .filter(("age", lte(65)))?
//!     .filter(or([
//!         ("role", Value::from(is_in(vec!["admin", "owner"])?)),
//!         ("active", Value::from(true)),
//!     ])?)?
//!     .select(["name", "email"], ["_id"])?
//!     .sort(("name", 1))?
//!     .limit(10)?;
//!
//! assert_eq!(
//!     query.wheres(),
//!     doc! {
//!         "age": { "$gte": 18, "$lte": 65 },
//!         "$or": [{ "role": { "$in": ["admin", "owner"] } }, { "active": true }],
//!     }
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Making requests
//!
//! The [`Client`] owns a query accumulator. Terminal operations execute it and, unless
//! `auto_reset_query` is disabled, reset it.
//!
//! ```no_run
//! # fn doc() -> mongo_fluent::Result<()> {
//! use mongo_fluent::bson::doc;
//!
//! let mut client = mongo_fluent::Client::builder()
//!     .config_file("./mongo.toml")
//!     .group("production")
//!     .build()?;
//!
//! let id = client.insert("users", doc! { "name": "foo", "age": 21 })?;
//! println!("inserted {:?}", id);
//!
//! client.query().filter(("name", "foo"))?.inc(("age", 1))?;
//! client.update("users")?;
//!
//! let count = client.count("users")?;
//! println!("{} users", count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Optional Features
//!
//! The following are a list of [Cargo Features][cargo-features] that can be enabled or disabled:
//!
//! - **chrono**: Converts `chrono::DateTime<Utc>` into query values.
//!
//! [config]: ./config/index.html
//! [connection]: ./connection/index.html
//! [operator]: ./operator/index.html
//! [query]: ./query/index.html
//! [cargo-features]: https://doc.rust-lang.org/stable/cargo/reference/manifest.html#the-features-section

#![deny(missing_docs)]
#![deny(unused_imports)]

pub extern crate bson;
#[macro_use]
extern crate log;
pub extern crate mongodb as db;

pub use self::client::{Client, ClientBuilder};
pub use self::collection::Collection;
pub use self::config::{
    Config, ConfigFile, ConnectionConfig, DriverConfig, ReturnAs, Settings, DEFAULT_GROUP,
};
pub use self::connection::ConnectionString;
pub use self::document::{create_document_id, date, document_id, timestamp, Record};
pub use self::driver::{BulkWrite, Connect, Driver, MongoDriver, Write, WriteResult};
pub use self::error::{Error, Kind as ErrorKind, Result};
pub use self::field::{FieldNames, IntoFields};
pub use self::operator::Operator;
pub use self::query::{Options, Order, PushOptions, Query, DEFAULT_LIMIT};
pub use self::value::{Map, Value};

mod client;
mod collection;
pub mod config;
pub mod connection;
mod document;
pub mod driver;
mod error;
mod field;
pub mod operator;
pub mod query;
mod value;
