//! Task-rule expression language.
//!
//! Rules are small boolean expressions over a process's data:
//!
//! ```text
//! procdata.amount.total == "100" && (procdata.flag.urgent == yes || procdata.flag.vip == "true")
//! ```
//!
//! Grammar:
//!
//! ```text
//! expr       := or
//! or         := and ( ("||" | "or") and )*
//! and        := leaf ( ("&&" | "and") leaf )*
//! leaf       := "(" expr ")" | comparison | "default"
//! comparison := "procdata." TYPE "." FIELD ("==" | "!=") VALUE
//! VALUE      := quoted-string | bare-token
//! ```
//!
//! `and`/`or`/`default` and the `procdata.` prefix are matched
//! case-insensitively and only as whole words; the data-type and field
//! names compare exactly. Evaluation is a pure function of the rule text
//! and a [`ProcessDataSnapshot`], so the advancer can materialize the
//! snapshot once inside its transaction and re-run rules freely.

pub mod evaluator;
pub mod parser;

pub use evaluator::evaluate;
pub use parser::{parse, CompareOp, Comparison, RuleExpr};

use std::collections::HashMap;
use thiserror::Error;

/// Rule parse error. A rule that fails to parse is treated as non-matching
/// by the advancer rather than aborting advancement.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Parse error: {0}")]
pub struct RuleParseError(pub String);

/// The `default` sentinel: not an expression, but the advancer's fallback
/// edge when no other rule matches.
pub fn is_default_rule(rule: &str) -> bool {
    rule.trim().eq_ignore_ascii_case("default")
}

/// In-memory view of one process's data rows, keyed by the exact
/// process-data-type description and fieldname.
///
/// When the same `(type, fieldname)` pair was written more than once, the
/// row with the highest `process_data_no` wins.
#[derive(Debug, Clone, Default)]
pub struct ProcessDataSnapshot {
    entries: HashMap<(String, String), (i32, String)>,
}

impl ProcessDataSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a datum, keeping the newest row per `(type, fieldname)`.
    pub fn insert(&mut self, process_data_no: i32, type_description: &str, fieldname: &str, value: &str) {
        let key = (type_description.to_string(), fieldname.to_string());
        match self.entries.get(&key) {
            Some((existing_no, _)) if *existing_no >= process_data_no => {}
            _ => {
                self.entries.insert(key, (process_data_no, value.to_string()));
            }
        }
    }

    /// Look up the effective value for a `(type, fieldname)` pair.
    pub fn get(&self, type_description: &str, fieldname: &str) -> Option<&str> {
        self.entries
            .get(&(type_description.to_string(), fieldname.to_string()))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinel() {
        assert!(is_default_rule("default"));
        assert!(is_default_rule("  Default "));
        assert!(is_default_rule("DEFAULT"));
        assert!(!is_default_rule("default rule"));
        assert!(!is_default_rule("procdata.a.b == default"));
    }

    #[test]
    fn test_snapshot_newest_row_wins() {
        let mut snap = ProcessDataSnapshot::new();
        snap.insert(1, "amount", "total", "50");
        snap.insert(3, "amount", "total", "100");
        snap.insert(2, "amount", "total", "75");
        assert_eq!(snap.get("amount", "total"), Some("100"));
    }

    #[test]
    fn test_snapshot_exact_match() {
        let mut snap = ProcessDataSnapshot::new();
        snap.insert(1, "Amount", "total", "100");
        assert_eq!(snap.get("Amount", "total"), Some("100"));
        assert_eq!(snap.get("amount", "total"), None);
        assert_eq!(snap.get("Amount", "Total"), None);
    }
}
