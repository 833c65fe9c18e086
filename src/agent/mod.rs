//! Agent module: goal decomposition, task classification, and dispatch.

pub mod decomposer;
pub mod dispatcher;
pub mod orchestrator;
pub mod task;

pub use decomposer::{DecomposerConfig, GoalDecomposer};
pub use dispatcher::{DispatchTable, Dispatcher};
pub use orchestrator::{GoalReport, Orchestrator};
pub use task::{ExecutionResult, Subtask, TaskType, classify};
