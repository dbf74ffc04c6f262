use std::sync::Arc;

use crate::Result;
use crate::collection::Collection;
use crate::query::{Filter, Ordering, Row};

/// Record-oriented access to the relational store.
///
/// Every call is a single statement on the server side: a batch insert either
/// stores all rows or none, and constraint violations surface as a
/// [`crate::StoreError`] with the matching code. There are no multi-statement
/// transactions; callers that need atomicity across calls compensate.
pub trait RecordStore: Send + Sync {
    /// Insert one row, returning it as stored (with `id` and defaults filled in).
    ///
    /// # Errors
    ///
    /// Returns an error if a constraint is violated or the store is unreachable.
    fn insert(&self, collection: Collection, row: Row) -> Result<Row>;

    /// Insert several rows in one statement, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns an error, and stores nothing, if any row violates a constraint.
    fn insert_many(&self, collection: Collection, rows: Vec<Row>) -> Result<Vec<Row>>;

    /// Merge `patch` into every row matching `filter`, returning the updated rows.
    ///
    /// # Errors
    ///
    /// Returns an error, and changes nothing, if any updated row violates a constraint.
    fn update(&self, collection: Collection, patch: Row, filter: &Filter) -> Result<Vec<Row>>;

    /// Delete every row matching `filter`, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a restricting foreign key still references a row.
    fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize>;

    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Row>>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn insert(&self, collection: Collection, row: Row) -> Result<Row> {
        (**self).insert(collection, row)
    }

    fn insert_many(&self, collection: Collection, rows: Vec<Row>) -> Result<Vec<Row>> {
        (**self).insert_many(collection, rows)
    }

    fn update(&self, collection: Collection, patch: Row, filter: &Filter) -> Result<Vec<Row>> {
        (**self).update(collection, patch, filter)
    }

    fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize> {
        (**self).delete(collection, filter)
    }

    fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Row>> {
        (**self).select(collection, filter, ordering)
    }
}
