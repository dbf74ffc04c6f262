use std::sync::Arc;

use pizzaria_core::{GroupDraft, GroupWithItems, validate_group_payload};
use pizzaria_saga::SagaBuilder;
use pizzaria_store::RecordStore;
use serde_json::Value;
use tracing::debug;

use super::context::GroupSagaContext;
use super::log_failed_saga;
use super::saga_data::GroupSagaData;
use super::steps::{InsertGroupStep, InsertItemsStep};
use crate::{OperationError, Result};

/// Creates an option group together with its items.
///
/// Either both the group and every item are stored, or neither is: when the
/// item batch fails the created group is deleted again.
pub struct ProvisionGroupOperation<S: ?Sized> {
    store: Arc<S>,
}

impl<S> ProvisionGroupOperation<S>
where
    S: RecordStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate `payload` and provision it.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Validation` before any write when the payload
    /// is invalid, and otherwise the errors of [`Self::provision`].
    pub fn execute(&self, payload: &Value) -> Result<GroupWithItems> {
        let draft = validate_group_payload(payload)?;
        self.provision(draft)
    }

    /// Items come back in the order they were submitted.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::DuplicateGroupName` if the name is taken,
    /// `OperationError::RolledBack` if the items could not be stored and the
    /// group was removed again, or `OperationError::CompensationFailed` if
    /// removing it failed too.
    pub fn provision(&self, draft: GroupDraft) -> Result<GroupWithItems> {
        debug!(name = %draft.name, items = draft.items.len(), "provisioning option group");

        let saga = SagaBuilder::new()
            .first_step(InsertGroupStep::<S>::new())
            .then(InsertItemsStep::<S>::new())
            .build();
        let context = GroupSagaContext::new(Arc::clone(&self.store));

        let (result, audit) =
            saga.execute_with_audit(&context, GroupSagaData::for_new_group(draft));
        let data = result.map_err(|e| {
            let err = OperationError::from(e);
            log_failed_saga("provision_option_group", &audit, &err);
            err
        })?;

        let group = data
            .group
            .ok_or(OperationError::MissingSagaState("the created option group"))?;
        Ok(GroupWithItems {
            group,
            items: data.items,
        })
    }
}
