/// One write in a saga, together with the action that undoes it.
///
/// `execute` turns the previous step's output into this step's output.
/// `compensate` receives that output back if a later step fails, so a step
/// that creates a record can delete exactly the record it created.
pub trait SagaStep: Send + Sync {
    /// Value received from the previous step, or the saga's input.
    type Input: Clone + Send + 'static;

    /// Value handed to the next step and kept for compensation.
    type Output: Clone + Send + 'static;

    /// Dependencies shared by every step of the saga.
    type Context;

    type Error;

    /// Stable identifier used in logs, audit records and errors.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error if the step could not complete. The saga then
    /// compensates every step that completed before it.
    fn execute(&self, ctx: &Self::Context, input: Self::Input)
    -> Result<Self::Output, Self::Error>;

    /// Undo the effects recorded in `output`.
    ///
    /// The default does nothing, which suits steps that only read.
    ///
    /// # Errors
    ///
    /// Returns an error if the undo itself failed. The saga keeps unwinding
    /// the remaining steps and reports the failure alongside the original one.
    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        let _ = (ctx, output);
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}
