use std::fmt::Debug;

use thiserror::Error;

/// An undo action that failed while unwinding a saga.
#[derive(Debug, Error)]
#[error("compensation failed for step '{step}' ({description})")]
pub struct CompensationError<E> {
    pub step: String,
    /// What the undo was trying to do, e.g. "delete option group 'Tamanho'".
    pub description: String,
    #[source]
    pub error: E,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// A step failed and every completed step was undone.
    #[error("step '{step}' failed")]
    StepFailed {
        step: String,
        #[source]
        source: E,
        /// Steps that were undone, most recent first.
        compensated: Vec<String>,
    },

    /// A step failed and at least one undo failed too, leaving partial state behind.
    #[error("step '{failed_step}' failed and {} compensation(s) also failed", compensation_errors.len())]
    CompensationFailed {
        failed_step: String,
        step_error: E,
        compensation_errors: Vec<CompensationError<E>>,
    },
}

impl<E: Debug> SagaError<E> {
    /// Name of the step whose failure started the rollback.
    #[must_use]
    pub fn failed_step(&self) -> &str {
        match self {
            Self::StepFailed { step, .. } => step,
            Self::CompensationFailed { failed_step, .. } => failed_step,
        }
    }

    #[must_use]
    pub fn is_fully_compensated(&self) -> bool {
        matches!(self, Self::StepFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct StoreDown(&'static str);

    #[test]
    fn compensation_error_names_step_and_description() {
        let err = CompensationError {
            step: "insert_option_group".to_string(),
            description: "delete option group 'Tamanho'".to_string(),
            error: StoreDown("connection reset"),
        };

        let msg = err.to_string();

        assert!(msg.contains("insert_option_group"));
        assert!(msg.contains("delete option group 'Tamanho'"));
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string),
            Some("connection reset".to_string())
        );
    }

    #[test]
    fn compensation_failed_counts_failed_undos() {
        let err: SagaError<StoreDown> = SagaError::CompensationFailed {
            failed_step: "insert_option_items".to_string(),
            step_error: StoreDown("batch rejected"),
            compensation_errors: vec![CompensationError {
                step: "insert_option_group".to_string(),
                description: "delete group".to_string(),
                error: StoreDown("timeout"),
            }],
        };

        assert_eq!(
            err.to_string(),
            "step 'insert_option_items' failed and 1 compensation(s) also failed"
        );
        assert_eq!(err.failed_step(), "insert_option_items");
        assert!(!err.is_fully_compensated());
    }

    #[test]
    fn step_failed_is_fully_compensated() {
        let err: SagaError<StoreDown> = SagaError::StepFailed {
            step: "insert_option_items".to_string(),
            source: StoreDown("batch rejected"),
            compensated: vec!["insert_option_group".to_string()],
        };

        assert!(err.is_fully_compensated());
        assert_eq!(err.failed_step(), "insert_option_items");
    }
}
