//! The seam between the [`Client`](crate::Client) and the server.
//!
//! A [`Driver`] executes the kinds of request the client issues: finds, bulk writes, commands
//! and cursor commands. [`MongoDriver`] implements it on top of the official `mongodb` crate, other
//! implementations can be swapped in through [`ClientBuilder::connect`](crate::ClientBuilder::connect).
use bson::{Bson, Document};
use mongodb::options::{FindOptions, RunCursorCommandOptions, SelectionCriteria, WriteConcern};

use crate::config::{DriverConfig, Settings};
use crate::connection::ConnectionString;
use crate::error::Result;

mod mongo;

pub use self::mongo::MongoDriver;

/// Executes requests against a deployment.
pub trait Driver {
    /// Runs a find on `database.collection`, returning every matching document.
    fn execute_query(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>>;

    /// Runs a batch of writes on `database.collection`.
    fn execute_bulk_write(
        &self,
        database: &str,
        collection: &str,
        bulk: BulkWrite,
        write_concern: WriteConcern,
    ) -> Result<WriteResult>;

    /// Runs a database command, returning its reply as the only document.
    fn execute_command(
        &self,
        database: &str,
        command: Document,
        selection_criteria: SelectionCriteria,
    ) -> Result<Vec<Document>>;

    /// Runs a database command which opens a cursor, such as `aggregate`, returning the
    /// documents of every batch.
    fn execute_cursor_command(
        &self,
        database: &str,
        command: Document,
        options: RunCursorCommandOptions,
    ) -> Result<Vec<Document>>;
}

/// Builds a [`Driver`] from prepared connection parameters.
pub trait Connect: Sized {
    /// Connects to the deployment described by `connection`.
    ///
    /// # Errors
    ///
    /// This method errors if the deployment can not be reached or the parameters are rejected.
    fn connect(
        connection: &ConnectionString,
        settings: &Settings,
        driver: &DriverConfig,
    ) -> Result<Self>;
}

/// A single write of a [`BulkWrite`].
#[derive(Clone, Debug, PartialEq)]
pub enum Write {
    /// Inserts a document.
    Insert(Document),
    /// Updates the documents matching `filter`.
    Update {
        /// The documents to update.
        filter: Document,
        /// The update operators to apply.
        update: Document,
        /// Update every match rather than the first.
        multi: bool,
        /// Insert a document when nothing matches.
        upsert: bool,
    },
    /// Deletes the documents matching `filter`.
    Delete {
        /// The documents to delete.
        filter: Document,
        /// Delete the first match only.
        limit_one: bool,
    },
}

/// An ordered list of writes executed as one batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BulkWrite {
    /// Stop at the first failed write.
    pub ordered: bool,
    /// Skip document validation on the server.
    pub bypass_document_validation: Option<bool>,
    /// The writes to execute.
    pub writes: Vec<Write>,
}

impl BulkWrite {
    /// Constructs an empty batch.
    pub fn new(ordered: bool) -> Self {
        Self {
            ordered,
            bypass_document_validation: None,
            writes: vec![],
        }
    }

    /// Appends a write to the batch.
    pub fn push(&mut self, write: Write) -> &mut Self {
        self.writes.push(write);
        self
    }
}

/// The counts reported by a [`BulkWrite`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteResult {
    /// The number of inserted documents.
    pub inserted: u64,
    /// The number of documents matched by updates.
    pub matched: u64,
    /// The number of documents changed by updates.
    pub modified: u64,
    /// The identifiers of upserted documents.
    pub upserted: Vec<Bson>,
    /// The number of deleted documents.
    pub deleted: u64,
}

impl WriteResult {
    pub(crate) fn absorb(&mut self, other: WriteResult) {
        self.inserted += other.inserted;
        self.matched += other.matched;
        self.modified += other.modified;
        self.upserted.extend(other.upserted);
        self.deleted += other.deleted;
    }
}
