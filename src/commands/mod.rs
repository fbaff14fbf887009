//! Top-level operations: one pass, the periodic scheduler, and cleanup

pub mod cleanup;
pub mod schedule;
pub mod sync;
