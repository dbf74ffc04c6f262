use std::fmt::{Debug, Display};
use std::marker::PhantomData;

use tracing::{debug, error, info, warn};

use crate::audit::SagaAuditLog;
use crate::erased::ErasedStep;
use crate::error::{CompensationError, SagaError};
use crate::value::ErasedValue;

/// A sequence of steps with reverse-order compensation, built by [`crate::SagaBuilder`].
pub struct Saga<Input, Output, Ctx, Err> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output)>,
}

struct Completed {
    step: usize,
    audit: usize,
    output: Box<dyn ErasedValue>,
}

impl<Input, Output, Ctx, Err> Saga<Input, Output, Ctx, Err>
where
    Input: Clone + Send + 'static,
    Output: Send + 'static,
    Err: Debug + Display,
{
    pub(crate) fn from_steps(steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>) -> Self {
        Self {
            steps,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run every step in order.
    ///
    /// # Errors
    ///
    /// Returns `SagaError::StepFailed` when a step fails and all completed steps
    /// were undone, or `SagaError::CompensationFailed` when some undo failed too.
    pub fn execute(&self, ctx: &Ctx, input: Input) -> Result<Output, SagaError<Err>> {
        self.run(ctx, input).0
    }

    /// Like [`Saga::execute`], also returning the audit log of the run.
    pub fn execute_with_audit(
        &self,
        ctx: &Ctx,
        input: Input,
    ) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        self.run(ctx, input)
    }

    fn run(&self, ctx: &Ctx, input: Input) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        let mut audit = SagaAuditLog::new();
        let mut completed: Vec<Completed> = Vec::with_capacity(self.steps.len());
        let mut current: Box<dyn ErasedValue> = Box::new(input);

        for (index, step) in self.steps.iter().enumerate() {
            let audit_index = audit.record_start(step.name());
            debug!(step = step.name(), "executing saga step");

            match step.execute_erased(ctx, current) {
                Ok(output) => {
                    audit.record_success(audit_index, step.compensation_description());
                    completed.push(Completed {
                        step: index,
                        audit: audit_index,
                        output: output.duplicate(),
                    });
                    current = output;
                }
                Err(step_error) => {
                    audit.record_failure(audit_index, step_error.to_string());
                    warn!(step = step.name(), error = %step_error, "saga step failed, rolling back");
                    let err = self.unwind(ctx, &mut audit, completed, step.name(), step_error);
                    return (Err(err), audit);
                }
            }
        }

        let output = current
            .into_any()
            .downcast::<Output>()
            .expect("builder fixes the final output type");
        (Ok(*output), audit)
    }

    fn unwind(
        &self,
        ctx: &Ctx,
        audit: &mut SagaAuditLog,
        mut completed: Vec<Completed>,
        failed_step: &str,
        step_error: Err,
    ) -> SagaError<Err> {
        let mut compensated = Vec::new();
        let mut compensation_errors = Vec::new();

        while let Some(done) = completed.pop() {
            let step = &self.steps[done.step];
            let description = step.compensation_description();

            match step.compensate_erased(ctx, done.output) {
                Ok(()) => {
                    info!(step = step.name(), %description, "compensated saga step");
                    audit.record_compensated(done.audit);
                    compensated.push(step.name().to_string());
                }
                Err(error) => {
                    error!(
                        step = step.name(),
                        %description,
                        error = %error,
                        "compensation failed, state left behind"
                    );
                    audit.record_compensation_failed(done.audit, error.to_string());
                    compensation_errors.push(CompensationError {
                        step: step.name().to_string(),
                        description,
                        error,
                    });
                }
            }
        }

        if compensation_errors.is_empty() {
            SagaError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
                compensated,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}
