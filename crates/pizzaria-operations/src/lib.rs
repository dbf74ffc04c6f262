mod error;
pub mod operations;
pub mod providers;
mod records;
pub mod response;
pub mod traits;

pub use error::{CompensationFailure, FailureKind, OperationError, Result};
pub use response::{FailureDetail, FailureResponse};
