//! Shared domain model for the chorepay allowance tracker: task and
//! profile types, the recurrence view, and the photo-proof validator.
//! Everything here is pure data and pure functions; the stateful
//! controller lives in `chorepay-engine`.

pub mod domain;
pub mod proof;
pub mod recurrence;
