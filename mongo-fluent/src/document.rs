//! Query results and document helpers.
use std::time::{SystemTime, UNIX_EPOCH};

use bson::oid::ObjectId;
use bson::{Bson, Document, Timestamp};
use serde::de::DeserializeOwned;

use crate::config::ReturnAs;
use crate::error::{self, Result};

/// A document returned by a query, shaped by [`ReturnAs`].
///
/// In both shapes an `ObjectId` `_id` is replaced by its hex string.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// A BSON document.
    Document(Document),
    /// A relaxed extended JSON value.
    Json(serde_json::Value),
}

impl Record {
    pub(crate) fn new(mut doc: Document, return_as: ReturnAs) -> Self {
        if let Some(Bson::ObjectId(id)) = doc.get("_id") {
            let id = id.to_hex();
            doc.insert("_id", id);
        }
        match return_as {
            ReturnAs::Document => Record::Document(doc),
            ReturnAs::Json => Record::Json(Bson::Document(doc).into_relaxed_extjson()),
        }
    }

    /// Returns the BSON document, if this record is one.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Record::Document(doc) => Some(doc),
            Record::Json(_) => None,
        }
    }

    /// Returns the JSON value, if this record is one.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Record::Json(json) => Some(json),
            Record::Document(_) => None,
        }
    }

    /// The identifier of the record, as a string.
    pub fn id(&self) -> Option<String> {
        match self {
            Record::Document(doc) => document_id(doc),
            Record::Json(json) => json.get("_id").and_then(|id| match id {
                serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            }),
        }
    }

    /// Deserializes the record into `T`.
    ///
    /// # Errors
    ///
    /// This method errors if the record does not match the shape of `T`.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Record::Document(doc) => Ok(bson::from_document(doc)?),
            Record::Json(json) => serde_json::from_value(json).map_err(error::bson),
        }
    }
}

/// A BSON date, `millis` since the UNIX epoch or now.
pub fn date(millis: Option<i64>) -> bson::DateTime {
    match millis {
        Some(millis) if millis != 0 => bson::DateTime::from_millis(millis),
        _ => bson::DateTime::now(),
    }
}

/// A BSON timestamp, `time` seconds since the UNIX epoch or now, and an ordinal `increment`.
pub fn timestamp(time: Option<u32>, increment: u32) -> Timestamp {
    let time = match time {
        Some(time) if time != 0 => time,
        _ => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or_default(),
    };
    Timestamp { time, increment }
}

/// Parses `id` as an `ObjectId`, or generates a new one.
///
/// # Errors
///
/// This function errors if `id` is not a valid 24 character hex string.
pub fn create_document_id(id: Option<&str>) -> Result<ObjectId> {
    match id {
        Some(id) => {
            ObjectId::parse_str(id).map_err(|e| error::validation("create_document_id", e))
        }
        None => Ok(ObjectId::new()),
    }
}

/// The `_id` of `doc` as a string: an `ObjectId` as hex, a string as is, other values in their
/// extended JSON form.
pub fn document_id(doc: &Document) -> Option<String> {
    match doc.get("_id")? {
        Bson::ObjectId(id) => Some(id.to_hex()),
        Bson::String(s) if s.is_empty() => None,
        Bson::String(s) => Some(s.clone()),
        Bson::Null => None,
        other => Some(other.clone().into_relaxed_extjson().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use bson::doc;
    use serde::Deserialize;

    use crate::error::Kind;

    #[test]
    fn record_stringifies_object_id() {
        let id = ObjectId::new();
        let record = Record::new(doc! { "_id": id, "name": "foo" }, ReturnAs::Document);
        assert_eq!(
            record.as_document(),
            Some(&doc! { "_id": id.to_hex(), "name": "foo" })
        );
        assert_eq!(record.id(), Some(id.to_hex()));
    }

    #[test]
    fn record_as_json() {
        let id = ObjectId::new();
        let record = Record::new(doc! { "_id": id, "age": 3 }, ReturnAs::Json);
        let json = record.as_json().unwrap();
        assert_eq!(json["_id"], serde_json::Value::String(id.to_hex()));
        assert_eq!(json["age"], serde_json::json!(3));
        assert_eq!(record.id(), Some(id.to_hex()));
    }

    #[test]
    fn record_deserializes() {
        #[derive(Deserialize)]
        struct User {
            name: String,
        }
        let record = Record::new(doc! { "name": "foo" }, ReturnAs::Json);
        let user: User = record.deserialize().unwrap();
        assert_eq!(user.name, "foo");
    }

    #[test]
    fn helpers() {
        assert_eq!(date(Some(1_000)).timestamp_millis(), 1_000);
        assert!(date(None).timestamp_millis() > 0);

        let ts = timestamp(Some(10), 2);
        assert_eq!(ts.time, 10);
        assert_eq!(ts.increment, 2);
        assert!(timestamp(None, 0).time > 0);

        let id = create_document_id(None).unwrap();
        assert_eq!(create_document_id(Some(&id.to_hex())).unwrap(), id);
        let err = create_document_id(Some("nope")).unwrap_err();
        assert_eq!(*err.kind(), Kind::Validation);
    }

    #[test]
    fn ids() {
        let id = ObjectId::new();
        assert_eq!(document_id(&doc! { "_id": id }), Some(id.to_hex()));
        assert_eq!(document_id(&doc! { "_id": "abc" }), Some("abc".to_owned()));
        assert_eq!(document_id(&doc! { "_id": 5 }), Some("5".to_owned()));
        assert_eq!(document_id(&doc! { "name": "x" }), None);
    }
}
