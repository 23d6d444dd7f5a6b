//! Command implementations for rewardkit

pub mod dispatch;
pub mod reward;
pub mod rubric;
pub mod tools;
