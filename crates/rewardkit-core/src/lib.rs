//! Rewardkit Core Library
//!
//! Keyword-heuristic reward aggregation, rubric scoring through hosted models,
//! and a registry of small deterministic tools.

pub mod error;
pub mod logging;
pub mod reward;
pub mod rubric;
pub mod scorer;
pub mod settings;
pub mod tools;
