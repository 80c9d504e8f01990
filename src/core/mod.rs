pub mod context;
pub mod engine;
pub mod sequence;

pub use crate::domain::model::{StepOutcome, StepStatus};
pub use crate::domain::ports::CommandRunner;
pub use crate::utils::error::Result;
pub use context::DeployContext;
pub use sequence::{Step, StepResult, StepSequence};
