//! Conversion between typed records and store rows.
//!
//! Rows coming back from the store are checked against the record type here;
//! past this point nothing handles untyped rows.

use pizzaria_core::ItemDraft;
use pizzaria_store::{Collection, Row};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::{OperationError, Result};

pub(crate) fn to_row<T: Serialize>(collection: Collection, record: &T) -> Result<Row> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(other) => Err(OperationError::MalformedRow {
            collection,
            reason: format!("expected an object, got {other}"),
        }),
        Err(e) => Err(OperationError::MalformedRow {
            collection,
            reason: e.to_string(),
        }),
    }
}

pub(crate) fn from_row<T: DeserializeOwned>(collection: Collection, row: Row) -> Result<T> {
    serde_json::from_value(Value::Object(row)).map_err(|e| OperationError::MalformedRow {
        collection,
        reason: e.to_string(),
    })
}

pub(crate) fn from_rows<T: DeserializeOwned>(collection: Collection, rows: Vec<Row>) -> Result<Vec<T>> {
    rows.into_iter().map(|row| from_row(collection, row)).collect()
}

/// Item row for `group_id`; product-derived items are written without a name.
pub(crate) fn item_row(group_id: Uuid, draft: &ItemDraft) -> Result<Row> {
    let mut row = to_row(Collection::OptionItems, &draft.clone().normalized())?;
    row.insert("grupo_id".to_string(), Value::String(group_id.to_string()));
    Ok(row)
}
