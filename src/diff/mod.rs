//! Diff engine - Change detection and orphan planning

mod compare;
mod plan;

pub use compare::{compare_files, needs_copy};
pub use plan::{plan_orphans, OrphanPlan};
