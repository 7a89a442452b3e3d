/// Runtime orchestrator module - Gateway

mod launcher;
mod non_interactive;
mod orchestrator;

pub use launcher::Launcher;
pub use non_interactive::{ExecutionMetadata, NonInteractiveResult, NonInteractiveRunner};
pub use orchestrator::{apology_for, Orchestrator, SubmitOutcome};
