// Adapters layer: concrete implementations for the outside world (child processes, project directory).

pub mod process;
pub mod workspace;

pub use process::ProcessRunner;
pub use workspace::Workspace;
