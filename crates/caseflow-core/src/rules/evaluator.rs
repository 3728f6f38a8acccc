//! Evaluator for parsed rule expressions.
//!
//! Pure: the snapshot is the only input besides the AST, so repeated
//! evaluations of the same rule against the same data always agree.

use super::parser::{CompareOp, Comparison, RuleExpr};
use super::ProcessDataSnapshot;

/// Evaluate a rule expression against a process-data snapshot.
///
/// A comparison whose datum is absent is false for both `==` and `!=`:
/// no value, no match. `default` is false inside compound expressions;
/// its fallback meaning belongs to the advancer, not the evaluator.
pub fn evaluate(expr: &RuleExpr, data: &ProcessDataSnapshot) -> bool {
    match expr {
        RuleExpr::Comparison(cmp) => evaluate_comparison(cmp, data),
        RuleExpr::Default => false,
        RuleExpr::And(left, right) => evaluate(left, data) && evaluate(right, data),
        RuleExpr::Or(left, right) => evaluate(left, data) || evaluate(right, data),
    }
}

fn evaluate_comparison(cmp: &Comparison, data: &ProcessDataSnapshot) -> bool {
    let Some(actual) = data.get(&cmp.data_type, &cmp.field) else {
        return false;
    };

    match cmp.op {
        CompareOp::Eq => actual == cmp.value,
        CompareOp::Ne => actual != cmp.value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse;

    fn snapshot(entries: &[(&str, &str, &str)]) -> ProcessDataSnapshot {
        let mut snap = ProcessDataSnapshot::new();
        for (i, (dtype, field, value)) in entries.iter().enumerate() {
            snap.insert(i as i32 + 1, dtype, field, value);
        }
        snap
    }

    fn eval(rule: &str, snap: &ProcessDataSnapshot) -> bool {
        evaluate(&parse(rule).unwrap(), snap)
    }

    #[test]
    fn test_equality() {
        let snap = snapshot(&[("amount", "total", "100")]);
        assert!(eval(r#"procdata.amount.total == "100""#, &snap));
        assert!(!eval(r#"procdata.amount.total == "200""#, &snap));
        assert!(eval(r#"procdata.amount.total != "200""#, &snap));
        assert!(!eval(r#"procdata.amount.total != "100""#, &snap));
    }

    #[test]
    fn test_missing_datum_is_false_for_both_operators() {
        let snap = ProcessDataSnapshot::new();
        assert!(!eval("procdata.amount.total == 100", &snap));
        assert!(!eval("procdata.amount.total != 100", &snap));
    }

    #[test]
    fn test_default_is_false_in_compound() {
        let snap = snapshot(&[("t", "f", "1")]);
        assert!(!eval("default", &snap));
        assert!(eval("default || procdata.t.f == 1", &snap));
        assert!(!eval("default && procdata.t.f == 1", &snap));
    }

    #[test]
    fn test_newest_row_wins() {
        let mut snap = ProcessDataSnapshot::new();
        snap.insert(1, "amount", "total", "50");
        snap.insert(9, "amount", "total", "100");
        assert!(eval("procdata.amount.total == 100", &snap));
        assert!(!eval("procdata.amount.total == 50", &snap));
    }

    #[test]
    fn test_compound_expression() {
        // The branch rule from a review workflow: big amounts need either
        // the urgent flag or a vip client.
        let rule = r#"procdata.amount.total == "100" && (procdata.flag.urgent == "yes" || procdata.flag.vip == "true")"#;

        let matching = snapshot(&[("amount", "total", "100"), ("flag", "vip", "true")]);
        assert!(eval(rule, &matching));

        let non_matching = snapshot(&[
            ("amount", "total", "100"),
            ("flag", "urgent", "no"),
            ("flag", "vip", "false"),
        ]);
        assert!(!eval(rule, &non_matching));
    }

    #[test]
    fn test_precedence_or_over_and() {
        // a || b && c == a || (b && c) for every truth assignment
        for a in [false, true] {
            for b in [false, true] {
                for c in [false, true] {
                    let mut snap = ProcessDataSnapshot::new();
                    snap.insert(1, "t", "a", if a { "1" } else { "0" });
                    snap.insert(2, "t", "b", if b { "1" } else { "0" });
                    snap.insert(3, "t", "c", if c { "1" } else { "0" });

                    let flat =
                        "procdata.t.a == 1 || procdata.t.b == 1 && procdata.t.c == 1";
                    let grouped =
                        "procdata.t.a == 1 || (procdata.t.b == 1 && procdata.t.c == 1)";

                    assert_eq!(eval(flat, &snap), a || (b && c));
                    assert_eq!(eval(flat, &snap), eval(grouped, &snap));
                }
            }
        }
    }

    #[test]
    fn test_quoted_operators_compare_literally() {
        let snap = snapshot(&[("t", "f", "a && b")]);
        assert!(eval(r#"procdata.t.f == "a && b""#, &snap));

        let other = snapshot(&[("t", "f", "a")]);
        assert!(!eval(r#"procdata.t.f == "a && b""#, &other));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let snap = snapshot(&[("amount", "total", "100"), ("flag", "vip", "true")]);
        let rule = "procdata.amount.total == 100 && procdata.flag.vip == true";
        let first = eval(rule, &snap);
        for _ in 0..10 {
            assert_eq!(eval(rule, &snap), first);
        }
    }

    #[test]
    fn test_exact_type_and_field_match() {
        let snap = snapshot(&[("Amount", "Total", "100")]);
        assert!(!eval("procdata.amount.Total == 100", &snap));
        assert!(!eval("procdata.Amount.total == 100", &snap));
        assert!(eval("procdata.Amount.Total == 100", &snap));
    }
}
