use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::Result;
use crate::collection::Collection;
use crate::error::{StoreError, StoreErrorCode};
use crate::query::{Filter, Ordering, Row};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Insert,
    InsertMany,
    Update,
    Delete,
    Select,
}

#[derive(Debug)]
struct Fault {
    op: StoreOp,
    collection: Collection,
    code: StoreErrorCode,
    remaining: usize,
}

/// Wraps a store and fails chosen calls, for exercising rollback paths.
///
/// Calls are counted whether or not they fail; a failed call never reaches
/// the wrapped store.
pub struct FaultInjectingStore<S> {
    inner: S,
    faults: Mutex<Vec<Fault>>,
    calls: Mutex<HashMap<(StoreOp, Collection), usize>>,
}

impl<S: RecordStore> FaultInjectingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Mutex::new(Vec::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Fail the next call of `op` on `collection`.
    #[must_use]
    pub fn fail_next(self, op: StoreOp, collection: Collection, code: StoreErrorCode) -> Self {
        self.fail_times(op, collection, code, 1)
    }

    #[must_use]
    pub fn fail_times(
        self,
        op: StoreOp,
        collection: Collection,
        code: StoreErrorCode,
        times: usize,
    ) -> Self {
        self.faults.lock().push(Fault {
            op,
            collection,
            code,
            remaining: times,
        });
        self
    }

    #[must_use]
    pub fn calls(&self, op: StoreOp, collection: Collection) -> usize {
        self.calls.lock().get(&(op, collection)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn enter(&self, op: StoreOp, collection: Collection) -> Result<()> {
        *self.calls.lock().entry((op, collection)).or_insert(0) += 1;

        let mut faults = self.faults.lock();
        let Some(fault) = faults
            .iter_mut()
            .find(|f| f.op == op && f.collection == collection && f.remaining > 0)
        else {
            return Ok(());
        };
        fault.remaining -= 1;
        debug!(?op, table = %collection, code = %fault.code, "injecting store fault");
        Err(StoreError::new(
            fault.code,
            format!("injected {op:?} failure on {collection}"),
        ))
    }
}

impl<S: RecordStore> RecordStore for FaultInjectingStore<S> {
    fn insert(&self, collection: Collection, row: Row) -> Result<Row> {
        self.enter(StoreOp::Insert, collection)?;
        self.inner.insert(collection, row)
    }

    fn insert_many(&self, collection: Collection, rows: Vec<Row>) -> Result<Vec<Row>> {
        self.enter(StoreOp::InsertMany, collection)?;
        self.inner.insert_many(collection, rows)
    }

    fn update(&self, collection: Collection, patch: Row, filter: &Filter) -> Result<Vec<Row>> {
        self.enter(StoreOp::Update, collection)?;
        self.inner.update(collection, patch, filter)
    }

    fn delete(&self, collection: Collection, filter: &Filter) -> Result<usize> {
        self.enter(StoreOp::Delete, collection)?;
        self.inner.delete(collection, filter)
    }

    fn select(
        &self,
        collection: Collection,
        filter: &Filter,
        ordering: Option<&Ordering>,
    ) -> Result<Vec<Row>> {
        self.enter(StoreOp::Select, collection)?;
        self.inner.select(collection, filter, ordering)
    }
}
