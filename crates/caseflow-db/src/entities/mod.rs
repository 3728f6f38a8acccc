//! Database entities - direct translations of the workflow engine tables.
//!
//! Every table carries a `tmstamp` write timestamp and a `usrid` actor
//! column. Primary keys are database-assigned integers.

pub mod case;
pub mod catalog;
pub mod process;
pub mod step;
pub mod user;

pub use case::*;
pub use catalog::*;
pub use process::*;
pub use step::*;
pub use user::*;

/// Canonical status description for an open process or step.
pub const STATUS_BUSY: &str = "busy";

/// Canonical status description for a closed process or step.
pub const STATUS_COMPLETE: &str = "complete";
