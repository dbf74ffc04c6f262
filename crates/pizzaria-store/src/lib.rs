//! The relational store as seen by the back-office.
//!
//! [`RecordStore`] is the contract the operations are written against: rows in
//! named collections, equality filters, one ordering column, and errors whose
//! code tells a unique-constraint violation apart from any other failure.
//! [`InMemoryStore`] enforces the same unique and foreign-key constraints as the
//! hosted database and backs both the server and the tests.

mod collection;
mod error;
#[cfg(any(test, feature = "testing"))]
mod fault;
mod memory;
mod query;
mod store;

pub use collection::Collection;
pub use error::{StoreError, StoreErrorCode};
#[cfg(any(test, feature = "testing"))]
pub use fault::{FaultInjectingStore, StoreOp};
pub use memory::InMemoryStore;
pub use query::{Filter, Ordering, Row};
pub use store::RecordStore;

pub type Result<T> = std::result::Result<T, StoreError>;
