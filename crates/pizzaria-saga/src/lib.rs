//! Application-level sagas for writes that span several records.
//!
//! A saga runs its steps in order, feeding each step's output into the next.
//! Every completed step leaves its output on a compensation stack; when a later
//! step fails, the stack is unwound in reverse order and each step is asked to
//! undo what it produced. Undo failures are collected and reported, never
//! discarded.

mod audit;
mod builder;
mod erased;
mod error;
mod saga;
mod step;
mod value;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::SagaStep;
