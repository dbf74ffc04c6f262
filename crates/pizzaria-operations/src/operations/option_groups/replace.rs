use std::sync::Arc;

use pizzaria_core::{GroupWithItems, validate_group_payload};
use pizzaria_saga::SagaBuilder;
use pizzaria_store::RecordStore;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::context::GroupSagaContext;
use super::log_failed_saga;
use super::saga_data::GroupSagaData;
use super::steps::{DeleteItemsStep, InsertItemsStep, UpdateGroupStep};
use crate::{OperationError, Result};

/// Rewrites a group's fields and replaces its whole item set.
///
/// Items are not diffed: the previous set is deleted and the submitted set
/// inserted. A failure restores the previous fields and items.
pub struct ReplaceGroupOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S> ReplaceGroupOperation<S>
where
    S: RecordStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Returns `OperationError::Validation` before any write for an invalid
    /// payload, `OperationError::GroupNotFound` for an unknown id,
    /// `OperationError::DuplicateGroupName` when renaming onto a taken name,
    /// and rollback errors as for provisioning.
    pub fn execute(&self, group_id: Uuid, payload: &Value) -> Result<GroupWithItems> {
        let draft = validate_group_payload(payload)?;
        debug!(%group_id, items = draft.items.len(), "replacing option group");

        let saga = SagaBuilder::new()
            .first_step(UpdateGroupStep::<S>::new())
            .then(DeleteItemsStep::<S>::new())
            .then(InsertItemsStep::<S>::new())
            .build();
        let context = GroupSagaContext::new(Arc::clone(&self.store));

        let (result, audit) = saga.execute_with_audit(
            &context,
            GroupSagaData::for_existing_group(group_id, draft),
        );
        let data = result.map_err(|e| {
            let err = OperationError::from(e);
            log_failed_saga("replace_option_group", &audit, &err);
            err
        })?;

        let group = data
            .group
            .ok_or(OperationError::MissingSagaState("the updated option group"))?;
        Ok(GroupWithItems {
            group,
            items: data.items,
        })
    }
}
