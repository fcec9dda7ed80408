#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use mongo_fluent::bson::Document;
use mongo_fluent::db::options::{
    FindOptions, RunCursorCommandOptions, SelectionCriteria, WriteConcern,
};
use mongo_fluent::{
    BulkWrite, Client, ClientBuilder, Connect, ConnectionString, Driver, DriverConfig, Error,
    Result, Settings, WriteResult,
};

/// A request seen by the `RecordingDriver`.
#[derive(Debug)]
pub enum Call {
    Query {
        database: String,
        collection: String,
        filter: Document,
        options: FindOptions,
    },
    BulkWrite {
        database: String,
        collection: String,
        bulk: BulkWrite,
    },
    Command {
        database: String,
        command: Document,
    },
    CursorCommand {
        database: String,
        command: Document,
        options: RunCursorCommandOptions,
    },
}

/// An in-memory driver which records every request and answers with scripted replies.
#[derive(Default)]
pub struct RecordingDriver {
    pub database: String,
    pub calls: RefCell<Vec<Call>>,
    pub replies: RefCell<VecDeque<Vec<Document>>>,
    pub fail: Cell<bool>,
}

impl RecordingDriver {
    pub fn reply(&self, documents: Vec<Document>) {
        self.replies.borrow_mut().push_back(documents);
    }

    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    fn next(&self) -> Result<Vec<Document>> {
        if self.fail.get() {
            return Err(Error::invalid_argument("scripted failure"));
        }
        Ok(self.replies.borrow_mut().pop_front().unwrap_or_default())
    }
}

impl Driver for RecordingDriver {
    fn execute_query(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        self.calls.borrow_mut().push(Call::Query {
            database: database.to_owned(),
            collection: collection.to_owned(),
            filter,
            options,
        });
        self.next()
    }

    fn execute_bulk_write(
        &self,
        database: &str,
        collection: &str,
        bulk: BulkWrite,
        _write_concern: WriteConcern,
    ) -> Result<WriteResult> {
        let inserted = bulk.writes.len() as u64;
        self.calls.borrow_mut().push(Call::BulkWrite {
            database: database.to_owned(),
            collection: collection.to_owned(),
            bulk,
        });
        self.next().map(|_| WriteResult {
            inserted,
            ..Default::default()
        })
    }

    fn execute_command(
        &self,
        database: &str,
        command: Document,
        _selection_criteria: SelectionCriteria,
    ) -> Result<Vec<Document>> {
        self.calls.borrow_mut().push(Call::Command {
            database: database.to_owned(),
            command,
        });
        self.next()
    }

    fn execute_cursor_command(
        &self,
        database: &str,
        command: Document,
        options: RunCursorCommandOptions,
    ) -> Result<Vec<Document>> {
        self.calls.borrow_mut().push(Call::CursorCommand {
            database: database.to_owned(),
            command,
            options,
        });
        self.next()
    }
}

impl Connect for RecordingDriver {
    fn connect(
        connection: &ConnectionString,
        _settings: &Settings,
        _driver: &DriverConfig,
    ) -> Result<Self> {
        if connection.database == "unreachable" {
            return Err(Error::invalid_argument("unreachable database"));
        }
        Ok(Self {
            database: connection.database.clone(),
            ..Default::default()
        })
    }
}

pub fn builder() -> ClientBuilder {
    Client::builder()
        .connection_string("mongodb://localhost:27017/test")
        .auth(false)
}

pub fn client() -> Client<RecordingDriver> {
    builder().connect().unwrap()
}
