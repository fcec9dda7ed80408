use std::thread;

use bson::Document;
use futures::stream::{Stream, TryStreamExt};
use mongodb::options::{
    ClientOptions, DeleteOptions, FindOptions, InsertOneOptions, RunCursorCommandOptions,
    SelectionCriteria, UpdateOptions, WriteConcern,
};
use mongodb::{Collection, Database};

use super::{BulkWrite, Connect, Driver, Write, WriteResult};
use crate::config::{DriverConfig, Settings};
use crate::connection::ConnectionString;
use crate::error::{self, Result};

#[allow(clippy::large_enum_variant)]
enum Request {
    Query(String, String, Document, FindOptions),
    BulkWrite(String, String, BulkWrite, WriteConcern),
    Command(String, Document, SelectionCriteria),
    CursorCommand(String, Document, RunCursorCommandOptions),
}

enum Response {
    Documents(Vec<Document>),
    Written(WriteResult),
}

type OneshotResponse = std::sync::mpsc::Sender<Result<Response>>;
type ThreadSender = tokio::sync::mpsc::UnboundedSender<(Request, OneshotResponse)>;

/// A [`Driver`] backed by the official `mongodb` crate.
///
/// The async client lives on a dedicated thread running a current thread runtime, requests are
/// shipped to it over a channel and the caller blocks until the reply arrives. Dropping the
/// driver closes the channel, which stops the thread.
pub struct MongoDriver {
    _thread: Option<thread::JoinHandle<()>>,
    tx: ThreadSender,
}

impl MongoDriver {
    fn execute(&self, req: Request) -> Result<Response> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.tx
            .send((req, tx))
            .map_err(|_| error::runtime("failed to send request to driver thread"))?;
        rx.recv().map_err(error::runtime)?
    }
}

impl Connect for MongoDriver {
    fn connect(
        connection: &ConnectionString,
        settings: &Settings,
        driver: &DriverConfig,
    ) -> Result<Self> {
        let uri = connection.driver_uri(settings.auth, driver);
        debug!("connecting to {}", connection.build(false));

        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<(Request, OneshotResponse)>();
        let (spawn_tx, spawn_rx) = std::sync::mpsc::channel::<Result<()>>();
        let handle = thread::Builder::new()
            .name("mongo-fluent-runtime".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(error::runtime)
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        if let Err(e) = spawn_tx.send(Err(e)) {
                            error!("failed to communicate runtime builder: {:?}", e);
                        }
                        return;
                    }
                };
                let f = async move {
                    let client = match ClientOptions::parse(&uri)
                        .await
                        .and_then(mongodb::Client::with_options)
                        .map_err(error::driver)
                    {
                        Ok(client) => client,
                        Err(e) => {
                            if let Err(e) = spawn_tx.send(Err(e)) {
                                error!("failed to create mongodb client: {:?}", e);
                            }
                            return;
                        }
                    };
                    if let Err(e) = spawn_tx.send(Ok(())) {
                        error!("failed to communicate successful startup: {:?}", e);
                        return;
                    }
                    while let Some((req, req_tx)) = rx.recv().await {
                        let resp = match req {
                            Request::Query(database, collection, filter, options) => {
                                trace!("find on {}.{}: {}", database, collection, filter);
                                let collection = client.database(&database).collection::<Document>(&collection);
                                find(&collection, filter, options)
                                    .await
                                    .map(Response::Documents)
                            }
                            Request::BulkWrite(database, collection, bulk, write_concern) => {
                                trace!(
                                    "bulk write of {} on {}.{}",
                                    bulk.writes.len(),
                                    database,
                                    collection
                                );
                                bulk_write(
                                    &client.database(&database).collection(&collection),
                                    bulk,
                                    write_concern,
                                )
                                .await
                                .map(Response::Written)
                            }
                            Request::Command(database, command, selection_criteria) => {
                                trace!("command on {}: {}", database, command);
                                client
                                    .database(&database)
                                    .run_command(command, selection_criteria)
                                    .await
                                    .map(|reply| Response::Documents(vec![reply]))
                                    .map_err(error::driver)
                            }
                            Request::CursorCommand(database, command, options) => {
                                trace!("cursor command on {}: {}", database, command);
                                run_cursor_command(&client.database(&database), command, options)
                                    .await
                                    .map(Response::Documents)
                            }
                        };
                        let _ = req_tx.send(resp);
                    }
                };
                rt.block_on(f);
            })
            .map_err(error::runtime)?;

        if let Err(e) = spawn_rx.recv().map_err(error::runtime)? {
            return Err(e);
        }

        Ok(Self {
            _thread: Some(handle),
            tx,
        })
    }
}

impl Driver for MongoDriver {
    fn execute_query(
        &self,
        database: &str,
        collection: &str,
        filter: Document,
        options: FindOptions,
    ) -> Result<Vec<Document>> {
        let req = Request::Query(database.to_owned(), collection.to_owned(), filter, options);
        match self.execute(req)? {
            Response::Documents(docs) => Ok(docs),
            _ => Err(error::runtime("incorrect response from driver thread")),
        }
    }

    fn execute_bulk_write(
        &self,
        database: &str,
        collection: &str,
        bulk: BulkWrite,
        write_concern: WriteConcern,
    ) -> Result<WriteResult> {
        let req = Request::BulkWrite(
            database.to_owned(),
            collection.to_owned(),
            bulk,
            write_concern,
        );
        match self.execute(req)? {
            Response::Written(result) => Ok(result),
            _ => Err(error::runtime("incorrect response from driver thread")),
        }
    }

    fn execute_command(
        &self,
        database: &str,
        command: Document,
        selection_criteria: SelectionCriteria,
    ) -> Result<Vec<Document>> {
        let req = Request::Command(database.to_owned(), command, selection_criteria);
        match self.execute(req)? {
            Response::Documents(docs) => Ok(docs),
            _ => Err(error::runtime("incorrect response from driver thread")),
        }
    }

    fn execute_cursor_command(
        &self,
        database: &str,
        command: Document,
        options: RunCursorCommandOptions,
    ) -> Result<Vec<Document>> {
        let req = Request::CursorCommand(database.to_owned(), command, options);
        match self.execute(req)? {
            Response::Documents(docs) => Ok(docs),
            _ => Err(error::runtime("incorrect response from driver thread")),
        }
    }
}

// Collects every document of a cursor, the driver fetching further batches as it goes.
async fn drain<S, E>(cursor: S) -> Result<Vec<Document>>
where
    S: Stream<Item = std::result::Result<Document, E>>,
    E: Into<error::Source>,
{
    cursor.map_err(error::driver).try_collect().await
}

async fn find(
    collection: &Collection<Document>,
    filter: Document,
    options: FindOptions,
) -> Result<Vec<Document>> {
    let cursor = collection
        .find(filter, options)
        .await
        .map_err(error::driver)?;
    drain(cursor).await
}

async fn bulk_write(
    collection: &Collection<Document>,
    bulk: BulkWrite,
    write_concern: WriteConcern,
) -> Result<WriteResult> {
    let BulkWrite {
        ordered,
        bypass_document_validation,
        writes,
    } = bulk;
    let mut result = WriteResult::default();
    let mut failure = None;
    for write in writes {
        let written = match write {
            Write::Insert(document) => {
                let mut options = InsertOneOptions::default();
                options.bypass_document_validation = bypass_document_validation;
                options.write_concern = Some(write_concern.clone());
                collection
                    .insert_one(document, options)
                    .await
                    .map(|_| WriteResult {
                        inserted: 1,
                        ..Default::default()
                    })
            }
            Write::Update {
                filter,
                update,
                multi,
                upsert,
            } => {
                let mut options = UpdateOptions::default();
                options.upsert = Some(upsert);
                options.bypass_document_validation = bypass_document_validation;
                options.write_concern = Some(write_concern.clone());
                let updated = if multi {
                    collection.update_many(filter, update, options).await
                } else {
                    collection.update_one(filter, update, options).await
                };
                updated.map(|r| WriteResult {
                    matched: r.matched_count,
                    modified: r.modified_count,
                    upserted: r.upserted_id.into_iter().collect(),
                    ..Default::default()
                })
            }
            Write::Delete { filter, limit_one } => {
                let mut options = DeleteOptions::default();
                options.write_concern = Some(write_concern.clone());
                let deleted = if limit_one {
                    collection.delete_one(filter, options).await
                } else {
                    collection.delete_many(filter, options).await
                };
                deleted.map(|r| WriteResult {
                    deleted: r.deleted_count,
                    ..Default::default()
                })
            }
        };
        match written {
            Ok(written) => result.absorb(written),
            Err(e) if ordered => return Err(error::driver(e)),
            Err(e) => {
                warn!("write failed in unordered batch: {}", e);
                if failure.is_none() {
                    failure = Some(e);
                }
            }
        }
    }
    match failure {
        Some(e) => Err(error::driver(e)),
        None => Ok(result),
    }
}

async fn run_cursor_command(
    database: &Database,
    command: Document,
    options: RunCursorCommandOptions,
) -> Result<Vec<Document>> {
    let cursor = database
        .run_cursor_command(command, options)
        .await
        .map_err(error::driver)?;
    drain(cursor).await
}
