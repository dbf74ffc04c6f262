//! Failure bodies returned to callers.
//!
//! Every [`OperationError`] maps to a [`FailureResponse`] carrying a readable
//! message, a machine-readable [`FailureKind`] and a list of details. Failed
//! rollbacks list each undo that failed so the records it left can be found.

use serde::Serialize;

use crate::{FailureKind, OperationError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureResponse {
    pub error: String,
    pub kind: FailureKind,
    pub details: Vec<FailureDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FailureDetail {
    /// A field-level validation problem.
    Field { path: String, message: String },
    /// An undo that failed during rollback.
    Compensation {
        step: String,
        description: String,
        error: String,
    },
    Cause { message: String },
}

/// Renders an error with its whole `source()` chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn causes(err: &OperationError) -> Vec<FailureDetail> {
    let mut details = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        details.push(FailureDetail::Cause {
            message: cause.to_string(),
        });
        source = cause.source();
    }
    details
}

impl From<&OperationError> for FailureResponse {
    fn from(err: &OperationError) -> Self {
        let details = match err {
            OperationError::Validation(errors) => errors
                .iter()
                .map(|e| FailureDetail::Field {
                    path: e.field().to_string(),
                    message: e.message(),
                })
                .collect(),
            OperationError::CompensationFailed {
                source, failures, ..
            } => std::iter::once(FailureDetail::Cause {
                message: error_chain(&**source),
            })
            .chain(failures.iter().map(|failure| FailureDetail::Compensation {
                step: failure.step.clone(),
                description: failure.description.clone(),
                error: error_chain(&*failure.error),
            }))
            .collect(),
            _ => causes(err),
        };

        Self {
            error: err.to_string(),
            kind: err.kind(),
            details,
        }
    }
}

impl From<OperationError> for FailureResponse {
    fn from(err: OperationError) -> Self {
        Self::from(&err)
    }
}
