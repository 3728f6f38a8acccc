//! # caseflow-core
//!
//! Workflow advancement engine for caseflow.
//!
//! This crate owns the two pieces of the system that are more than table
//! plumbing:
//!
//! - the **rule expression language** evaluated against a process's data
//!   (`rules`), and
//! - the **step advancer** (`advancer`), the transactional algorithm that
//!   closes a busy step and either opens the next one or completes the
//!   process, plus the matching **case intake** transaction (`intake`).

pub mod advancer;
pub mod error;
pub mod intake;
pub mod rules;

pub use advancer::StepAdvancer;
pub use error::{EngineError, EngineResult};
pub use intake::{open_case, CaseIntake};
pub use rules::{
    evaluate, is_default_rule, parse, CompareOp, Comparison, ProcessDataSnapshot, RuleExpr,
    RuleParseError,
};
