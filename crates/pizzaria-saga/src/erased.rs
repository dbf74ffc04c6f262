use crate::step::SagaStep;
use crate::value::ErasedValue;

/// Object-safe view of a [`SagaStep`] so steps with different types can share a `Vec`.
pub(crate) trait ErasedStep<Ctx, Err> {
    fn name(&self) -> &'static str;

    fn execute_erased(
        &self,
        ctx: &Ctx,
        input: Box<dyn ErasedValue>,
    ) -> Result<Box<dyn ErasedValue>, Err>;

    fn compensate_erased(&self, ctx: &Ctx, output: Box<dyn ErasedValue>) -> Result<(), Err>;

    fn compensation_description(&self) -> String;
}

pub(crate) struct TypedStep<S> {
    step: S,
}

impl<S> TypedStep<S> {
    pub(crate) fn new(step: S) -> Self {
        Self { step }
    }
}

impl<S> ErasedStep<S::Context, S::Error> for TypedStep<S>
where
    S: SagaStep,
{
    fn name(&self) -> &'static str {
        self.step.name()
    }

    fn execute_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn ErasedValue>,
    ) -> Result<Box<dyn ErasedValue>, S::Error> {
        let input = input
            .into_any()
            .downcast::<S::Input>()
            .expect("builder chains steps with matching input types");
        let output = self.step.execute(ctx, *input)?;
        Ok(Box::new(output))
    }

    fn compensate_erased(
        &self,
        ctx: &S::Context,
        output: Box<dyn ErasedValue>,
    ) -> Result<(), S::Error> {
        let output = output
            .into_any()
            .downcast::<S::Output>()
            .expect("compensation stack holds this step's own output");
        self.step.compensate(ctx, *output)
    }

    fn compensation_description(&self) -> String {
        self.step.compensation_description()
    }
}
