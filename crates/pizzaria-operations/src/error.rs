use pizzaria_core::ValidationErrors;
use pizzaria_saga::SagaError;
use pizzaria_store::{Collection, StoreError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::traits::AuthError;

/// Machine-readable class of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The request can be corrected by the client; nothing was written.
    ValidationFailed,
    /// A unique field (the group name) is already taken.
    Conflict,
    NotFound,
    Unauthorized,
    /// The store rejected a write or could not be reached.
    StoreFailure,
    /// A rollback step failed; records may be left behind in the store.
    CompensationFailure,
}

/// A rollback step that failed while undoing a partially applied write.
#[derive(Debug)]
pub struct CompensationFailure {
    pub step: String,
    pub description: String,
    pub error: Box<OperationError>,
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid payload")]
    Validation(#[from] ValidationErrors),

    #[error("an option group named '{name}' already exists")]
    DuplicateGroupName {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("option group '{0}' not found")]
    GroupNotFound(Uuid),

    #[error("failed to {action}")]
    Store {
        action: String,
        #[source]
        source: StoreError,
    },

    #[error("malformed row in '{collection}': {reason}")]
    MalformedRow {
        collection: Collection,
        reason: String,
    },

    #[error("saga state is missing {0}")]
    MissingSagaState(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("step '{step}' failed; the option group write was rolled back")]
    RolledBack {
        step: String,
        #[source]
        source: Box<OperationError>,
        compensated: Vec<String>,
    },

    #[error(
        "step '{step}' failed and {} rollback step(s) also failed; records may be left in the store",
        failures.len()
    )]
    CompensationFailed {
        step: String,
        #[source]
        source: Box<OperationError>,
        failures: Vec<CompensationFailure>,
    },
}

impl OperationError {
    pub(crate) fn store(action: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            action: action.into(),
            source,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::ValidationFailed,
            Self::DuplicateGroupName { .. } => FailureKind::Conflict,
            Self::GroupNotFound(_) => FailureKind::NotFound,
            Self::Auth(_) => FailureKind::Unauthorized,
            Self::Store { .. } | Self::MalformedRow { .. } | Self::MissingSagaState(_) => {
                FailureKind::StoreFailure
            }
            Self::RolledBack { source, .. } => source.kind(),
            Self::CompensationFailed { .. } => FailureKind::CompensationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        match err {
            // Nothing was written before the first step failed.
            SagaError::StepFailed {
                source,
                compensated,
                ..
            } if compensated.is_empty() => source,
            SagaError::StepFailed {
                step,
                source,
                compensated,
            } => Self::RolledBack {
                step,
                source: Box::new(source),
                compensated,
            },
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation_errors,
            } => Self::CompensationFailed {
                step: failed_step,
                source: Box::new(step_error),
                failures: compensation_errors
                    .into_iter()
                    .map(|e| CompensationFailure {
                        step: e.step,
                        description: e.description,
                        error: Box::new(e.error),
                    })
                    .collect(),
            },
            _ => Self::MissingSagaState("a recognised saga outcome"),
        }
    }
}
