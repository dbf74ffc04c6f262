use std::sync::Arc;

use pizzaria_core::{Product, validate_product_payload};
use pizzaria_store::{Collection, Filter, Ordering, RecordStore};
use serde_json::Value;
use tracing::info;

use crate::records::{from_row, from_rows, to_row};
use crate::{OperationError, Result};

pub struct CreateProductOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> CreateProductOperation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `OperationError::Validation` before writing if the payload is
    /// invalid, or a store error if the insert fails.
    pub fn execute(&self, payload: &Value) -> Result<Product> {
        let draft = validate_product_payload(payload)?;
        let row = to_row(Collection::Products, &draft)?;
        let stored = self
            .store
            .insert(Collection::Products, row)
            .map_err(|e| OperationError::store("insert product", e))?;
        let product: Product = from_row(Collection::Products, stored)?;
        info!(product_id = %product.id, name = %product.name, "inserted product");
        Ok(product)
    }
}

pub struct ListProductsOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> ListProductsOperation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Products ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn execute(&self) -> Result<Vec<Product>> {
        let rows = self
            .store
            .select(
                Collection::Products,
                &Filter::all(),
                Some(&Ordering::asc("nome")),
            )
            .map_err(|e| OperationError::store("list products", e))?;
        from_rows(Collection::Products, rows)
    }
}
