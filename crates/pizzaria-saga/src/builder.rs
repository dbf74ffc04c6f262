use std::fmt::{Debug, Display};
use std::marker::PhantomData;

use crate::erased::{ErasedStep, TypedStep};
use crate::saga::Saga;
use crate::step::SagaStep;

/// Builder state before the first step is added.
pub struct Empty;

/// Builder state once at least one step exists; `Last` is that step's output.
pub struct HasSteps<Last>(PhantomData<Last>);

/// Type-state builder for [`Saga`].
///
/// Each added step must accept the previous step's output, and `build` only
/// exists once a step has been added:
///
/// ```compile_fail
/// use pizzaria_saga::{SagaBuilder, SagaStep};
///
/// struct CreateGroup;
/// impl SagaStep for CreateGroup {
///     type Input = String;
///     type Output = u64;
///     type Context = ();
///     type Error = String;
///     fn name(&self) -> &'static str { "create_group" }
///     fn execute(&self, _: &(), _name: String) -> Result<u64, String> { Ok(1) }
/// }
///
/// struct RenameGroup;
/// impl SagaStep for RenameGroup {
///     type Input = String;
///     type Output = String;
///     type Context = ();
///     type Error = String;
///     fn name(&self) -> &'static str { "rename_group" }
///     fn execute(&self, _: &(), name: String) -> Result<String, String> { Ok(name) }
/// }
///
/// // RenameGroup takes a String but CreateGroup produces a u64.
/// let saga = SagaBuilder::new().first_step(CreateGroup).then(RenameGroup).build();
/// ```
///
/// ```compile_fail
/// use pizzaria_saga::SagaBuilder;
///
/// let saga = SagaBuilder::<(), (), (), String>::new().build();
/// ```
pub struct SagaBuilder<Input, Output, Ctx, Err, State> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output, State)>,
}

impl<Ctx, Err> SagaBuilder<(), (), Ctx, Err, Empty> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// The first step fixes the saga's input type.
    #[must_use]
    pub fn first_step<S>(
        self,
        step: S,
    ) -> SagaBuilder<S::Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(TypedStep::new(step)));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }
}

impl<Ctx, Err> Default for SagaBuilder<(), (), Ctx, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Input, Last, Ctx, Err> SagaBuilder<Input, Last, Ctx, Err, HasSteps<Last>> {
    #[must_use]
    pub fn then<S>(self, step: S) -> SagaBuilder<Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Input = Last, Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(TypedStep::new(step)));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn build(self) -> Saga<Input, Last, Ctx, Err>
    where
        Input: Clone + Send + 'static,
        Last: Send + 'static,
        Err: Debug + Display,
    {
        Saga::from_steps(self.steps)
    }
}
