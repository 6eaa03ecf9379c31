//! The VoCart command pipeline: one entry point that parses a
//! transcript, resolves it against the catalog, and emits a plan the
//! caller applies to its shopping list.
//!
//! The pipeline owns no list state. Every outcome is a [`CommandPlan`]
//! describing what should happen next: rows to return, a line to merge
//! or overwrite, a confirmation to answer, or a rejection with the
//! reason.

pub mod plan;
pub mod planner;

pub use plan::{CommandPlan, PlannedCommand, RejectReason, SearchResult};
pub use planner::CommandPlanner;
