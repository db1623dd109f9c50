// src/action/mod.rs

//! Agent actions invoked on behalf of the outside world.

pub mod run_script;
pub mod summary;

pub use run_script::RunScriptAction;
pub use summary::{join_names, ScriptFailures, ScriptResults, ScriptStatus};

/// Scheduling traits every action exposes to the dispatcher.
pub trait Action {
    /// Whether the dispatcher should run the action as a background task.
    fn is_asynchronous(&self) -> bool;

    /// Whether the task must survive an agent restart.
    fn is_persistent(&self) -> bool;
}
