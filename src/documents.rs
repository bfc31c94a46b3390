//! Dictionary form of the inventory records.
//!
//! Stored documents use the field names `id`, `name`, `stock`, `aisle`, `normalStock`,
//! `warningStock`, `alertStock`, `icon`, `color` for medicines, `medicineId`/`currentStock`
//! for history entries and `imageURL` for users. Every field is required; a document that
//! does not match is reported as [`Error::Decode`] rather than skipped.

use crate::{
    entities::{history_entry, medicine, user},
    errors::{Error, Result},
    models::Aisle,
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Field map of one stored document
pub type DocumentData = Map<String, Value>;

/// A record that can be written to and read back from a document collection.
pub trait Document: Serialize + DeserializeOwned {
    /// Collection the record lives in
    const COLLECTION: &'static str;
    /// Short name used in decode errors
    const KIND: &'static str;

    /// Converts the record into its field map.
    fn to_document(&self) -> Result<DocumentData> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::Decode {
                entity: Self::KIND,
                message: format!("expected an object, got {other}"),
            }),
            Err(e) => Err(Error::Decode {
                entity: Self::KIND,
                message: e.to_string(),
            }),
        }
    }

    /// Rebuilds a record from its field map.
    fn from_document(data: &DocumentData) -> Result<Self> {
        serde_json::from_value(Value::Object(data.clone())).map_err(|e| Error::Decode {
            entity: Self::KIND,
            message: e.to_string(),
        })
    }
}

impl Document for medicine::Model {
    const COLLECTION: &'static str = "medicines";
    const KIND: &'static str = "medicine";
}

impl Document for Aisle {
    const COLLECTION: &'static str = "aisles";
    const KIND: &'static str = "aisle";
}

impl Document for history_entry::Model {
    const COLLECTION: &'static str = "history";
    const KIND: &'static str = "history entry";
}

impl Document for user::Model {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "user";
}

/// Decodes a batch of documents, failing on the first one that does not match.
pub fn decode_documents<T: Document>(documents: &[DocumentData]) -> Result<Vec<T>> {
    documents.iter().map(T::from_document).collect()
}
