//! Rotation engine: one dated archive per candidate file, source truncated in place

mod engine;
mod outcome;
mod run;
mod target;

pub use engine::RotationEngine;
pub use outcome::{FailureStage, RotationOutcome, RotationStats, RunSummary};
pub use run::{rotate_logs, RunStatus};
pub use target::ArchiveTarget;
