//! `#count`: rank tuples along the chain; the count is the rank of the last one.

use aggrewrite_ast::{ComparisonOp, ProgramFragment, Rule, Term};

use super::ordering::{self, chain_rules};
use super::{compare, empty_value_rule, positive, result_rule, scoped, var, VALUE};
use crate::context::AggregateInfo;

const RANK: &str = "rank";

pub(crate) fn encode(info: &AggregateInfo) -> ProgramFragment {
    let id = info.id();
    let mut rules = chain_rules(id);

    // rank(A, T, 1) :- E(A, T), not has_prev(A, T).
    rules.push(Rule::new(
        scoped(id, RANK, vec![var("A"), var("T"), Term::integer(1)]),
        ordering::first(id, "T"),
    ));
    // rank(A, T2, K1) :- rank(A, T1, K), next(A, T1, T2), K1 = K + 1.
    rules.push(Rule::new(
        scoped(id, RANK, vec![var("A"), var("T2"), var("K1")]),
        vec![
            positive(scoped(id, RANK, vec![var("A"), var("T1"), var("K")])),
            ordering::next(id, "T1", "T2"),
            compare(
                var("K1"),
                ComparisonOp::Equal,
                Term::arithmetic("+", var("K"), Term::integer(1)),
            ),
        ],
    ));
    // value(A, K) :- rank(A, T, K), not has_next(A, T).
    rules.push(Rule::new(
        scoped(id, VALUE, vec![var("A"), var("K")]),
        vec![
            positive(scoped(id, RANK, vec![var("A"), var("T"), var("K")])),
            ordering::is_last(id, "T"),
        ],
    ));
    rules.push(empty_value_rule(info));
    rules.push(result_rule(info));

    ProgramFragment::from_rules(rules)
}
