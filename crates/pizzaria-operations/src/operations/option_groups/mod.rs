//! Option group provisioning and maintenance.
//!
//! Writes that touch both the group row and its items run as sagas: the store
//! has no multi-statement transactions, so each step carries the write that
//! undoes it.

mod context;
mod delete;
mod list;
mod provision;
mod replace;
mod saga_data;
mod steps;

pub use context::GroupSagaContext;
pub use delete::DeleteGroupOperation;
pub use list::{GetGroupOperation, ListGroupsOperation};
pub use provision::ProvisionGroupOperation;
pub use replace::ReplaceGroupOperation;
pub use saga_data::GroupSagaData;
pub use steps::{DeleteItemsStep, InsertGroupStep, InsertItemsStep, UpdateGroupStep};

use pizzaria_saga::SagaAuditLog;
use tracing::{error, warn};

use crate::{FailureKind, OperationError};

fn log_failed_saga(operation: &str, audit: &SagaAuditLog, err: &OperationError) {
    if err.kind() == FailureKind::CompensationFailure {
        for record in audit.unresolved() {
            error!(
                operation,
                step = %record.name,
                undo = record.compensation_description.as_deref().unwrap_or_default(),
                error = record.error.as_deref().unwrap_or_default(),
                "rollback left records behind"
            );
        }
    } else if matches!(err, OperationError::RolledBack { .. }) {
        warn!(operation, error = %err, steps = %audit.summary(), "write rolled back");
    }
}
