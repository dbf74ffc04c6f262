use std::sync::Arc;

use pizzaria_store::{Collection, Filter, RecordStore};
use tracing::info;
use uuid::Uuid;

use crate::{OperationError, Result};

/// Deletes a group row.
///
/// Items are not deleted here; the store's cascade on `grupo_id` removes them.
pub struct DeleteGroupOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> DeleteGroupOperation<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `OperationError::GroupNotFound` if no row has that id.
    pub fn execute(&self, group_id: Uuid) -> Result<()> {
        let removed = self
            .store
            .delete(
                Collection::OptionGroups,
                &Filter::eq("id", group_id.to_string()),
            )
            .map_err(|e| OperationError::store(format!("delete option group {group_id}"), e))?;
        if removed == 0 {
            return Err(OperationError::GroupNotFound(group_id));
        }
        info!(%group_id, "deleted option group");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pizzaria_store::InMemoryStore;
    use serde_json::json;

    use super::*;
    use crate::FailureKind;
    use crate::operations::option_groups::ProvisionGroupOperation;

    #[test]
    fn items_go_with_the_group() -> anyhow::Result<()> {
        let store = Arc::new(InMemoryStore::new());
        let created = ProvisionGroupOperation::new(Arc::clone(&store)).execute(&json!({
            "nome": "Tamanho",
            "tipo_selecao": "RADIO_OBRIGATORIO",
            "itens": [{"nome": "P"}, {"nome": "G", "preco_adicional": 5}]
        }))?;

        DeleteGroupOperation::new(Arc::clone(&store)).execute(created.group.id)?;

        assert_eq!(store.count(Collection::OptionGroups), 0);
        assert_eq!(store.count(Collection::OptionItems), 0);
        Ok(())
    }

    #[test]
    fn deleting_twice_is_not_found() -> anyhow::Result<()> {
        let store = Arc::new(InMemoryStore::new());
        let created = ProvisionGroupOperation::new(Arc::clone(&store)).execute(&json!({
            "nome": "Tamanho",
            "tipo_selecao": "RADIO_OBRIGATORIO",
            "itens": [{"nome": "P"}]
        }))?;
        let operation = DeleteGroupOperation::new(Arc::clone(&store));
        operation.execute(created.group.id)?;

        let err = operation.execute(created.group.id).expect_err("already gone");

        assert_eq!(err.kind(), FailureKind::NotFound);
        Ok(())
    }
}
