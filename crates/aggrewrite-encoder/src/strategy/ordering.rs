//! Successor chain over the distinct element tuples of one outer binding.
//!
//! Tuples are ordered by the standard total term order, so `T1 < T2` on two
//! `tuple(...)` terms is well defined for the grounder.

use aggrewrite_ast::{ComparisonOp, Literal, Rule};

use super::{compare, negative, positive, scoped, var};
use crate::element::element_tuple_atom;

pub(crate) const BETWEEN: &str = "between";
pub(crate) const NEXT: &str = "next";
pub(crate) const HAS_PREV: &str = "has_prev";
pub(crate) const HAS_NEXT: &str = "has_next";
pub(crate) const HAS_TUPLE: &str = "has_tuple";

/// Chain rules for occurrence `id`:
///
/// ```text
/// <id>_between(A, T1, T2) :- E(A, T1), E(A, T2), E(A, T3), T1 < T3, T3 < T2.
/// <id>_next(A, T1, T2) :- E(A, T1), E(A, T2), T1 < T2, not <id>_between(A, T1, T2).
/// <id>_has_prev(A, T2) :- <id>_next(A, T1, T2).
/// <id>_has_next(A, T1) :- <id>_next(A, T1, T2).
/// <id>_has_tuple(A) :- E(A, T).
/// ```
pub(crate) fn chain_rules(id: &str) -> Vec<Rule> {
    let tuple = |t: &str| positive(element_tuple_atom(id, var("A"), var(t)));

    vec![
        Rule::new(
            scoped(id, BETWEEN, vec![var("A"), var("T1"), var("T2")]),
            vec![
                tuple("T1"),
                tuple("T2"),
                tuple("T3"),
                compare(var("T1"), ComparisonOp::LessThan, var("T3")),
                compare(var("T3"), ComparisonOp::LessThan, var("T2")),
            ],
        ),
        Rule::new(
            scoped(id, NEXT, vec![var("A"), var("T1"), var("T2")]),
            vec![
                tuple("T1"),
                tuple("T2"),
                compare(var("T1"), ComparisonOp::LessThan, var("T2")),
                negative(scoped(id, BETWEEN, vec![var("A"), var("T1"), var("T2")])),
            ],
        ),
        Rule::new(
            scoped(id, HAS_PREV, vec![var("A"), var("T2")]),
            vec![positive(scoped(id, NEXT, vec![var("A"), var("T1"), var("T2")]))],
        ),
        Rule::new(
            scoped(id, HAS_NEXT, vec![var("A"), var("T1")]),
            vec![positive(scoped(id, NEXT, vec![var("A"), var("T1"), var("T2")]))],
        ),
        Rule::new(scoped(id, HAS_TUPLE, vec![var("A")]), vec![tuple("T")]),
    ]
}

/// `E(A, T), not <id>_has_prev(A, T)`: `T` starts the chain
pub(crate) fn first(id: &str, t: &str) -> Vec<Literal> {
    vec![
        positive(element_tuple_atom(id, var("A"), var(t))),
        negative(scoped(id, HAS_PREV, vec![var("A"), var(t)])),
    ]
}

/// `<id>_has_next` is false for `T`: it ends the chain
pub(crate) fn is_last(id: &str, t: &str) -> Literal {
    negative(scoped(id, HAS_NEXT, vec![var("A"), var(t)]))
}

/// `<id>_next(A, from, to)`
pub(crate) fn next(id: &str, from: &str, to: &str) -> Literal {
    positive(scoped(id, NEXT, vec![var("A"), var(from), var(to)]))
}
