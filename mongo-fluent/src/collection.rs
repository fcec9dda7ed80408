use std::marker::Unpin;

use bson::Document;
use serde::{de::DeserializeOwned, ser::Serialize};

use crate::error::{self, Result};

/// Ties a type to the collection its documents live in.
///
/// This trait can be thought of as a collection's name along with its schema. It is used by the
/// typed terminals of the [`Client`](crate::Client), such as
/// [`get_as`](crate::Client::get_as) and [`insert_as`](crate::Client::insert_as), while the
/// accumulated query still supplies the filter, projection, sort and paging.
///
/// # Examples
///
/// Defining a struct as a mongo document.
///
/// ```
/// use mongo_fluent::Collection;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Serialize)]
/// pub struct User {
///     pub name: String,
/// }
///
/// impl Collection for User {
///     const COLLECTION: &'static str = "users";
/// }
/// ```
pub trait Collection: DeserializeOwned + Serialize + Unpin + Send + Sync {
    /// The name of the collection to store the documents in.
    const COLLECTION: &'static str;

    /// Converts the value into a document.
    ///
    /// # Errors
    ///
    /// This method errors if the value does not serialize into a document.
    fn to_document(&self) -> Result<Document> {
        Ok(bson::to_document(self)?)
    }

    /// Converts a document into the value.
    ///
    /// # Errors
    ///
    /// This method errors if the document does not match the shape of the value.
    fn from_document(document: Document) -> Result<Self> {
        bson::from_document(document).map_err(error::bson)
    }
}
