//! HTTP endpoint handlers. Business logic lives in `crate::analysis`.

pub mod analyze;
pub mod health;
pub mod report;
