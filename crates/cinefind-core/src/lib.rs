//! Core logic for cinefind.
//!
//! - [`debounce`]: turns raw keystrokes into a debounced effective search term.
//! - [`workflow`]: per-workflow fetch state (idle / loading / loaded / failed).
//! - [`orchestrator`]: runs the popular, trending and search workflows and
//!   selects the list to display.
//! - [`analytics`]: records search counts in the document store.

/// Search-count analytics recorder.
pub mod analytics;
/// Trailing-edge debounce controller.
pub mod debounce;
/// Fetch orchestrator for the three workflows.
pub mod orchestrator;
/// Workflow state types.
pub mod workflow;

#[cfg(test)]
mod testing;
