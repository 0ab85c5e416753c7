//! Element rules.
//!
//! Each aggregate element becomes one rule deriving the tuples it contributes:
//!
//! ```text
//! 2 <= #count { X, Y : p(X, Y) }      under args(Y), depending on q(Y)
//! count_1_element_tuple(args(Y), tuple(X, Y)) :- p(X, Y), q(Y).
//! ```

use aggrewrite_ast::{AggregateElement, Atom, Rule, Term};

use crate::context::AggregateInfo;

/// Functor wrapping the element terms into one argument
pub const ELEMENT_TUPLE_FUNCTION_SYMBOL: &str = "tuple";

/// Name of the (not yet internalized) element tuple predicate of an occurrence
pub fn element_tuple_predicate(aggregate_id: &str) -> String {
    format!("{}_element_tuple", aggregate_id)
}

pub fn element_tuple_atom(aggregate_id: &str, arguments: Term, tuple: Term) -> Atom {
    Atom::new(&element_tuple_predicate(aggregate_id), vec![arguments, tuple])
}

/// `<id>_element_tuple(ARGS, tuple(t1, ..., tn))`
pub fn build_element_rule_head(
    aggregate_id: &str,
    element: &AggregateElement,
    aggregate_arguments: &Term,
) -> Atom {
    let tuple = Term::compound(ELEMENT_TUPLE_FUNCTION_SYMBOL, element.element_terms.clone());
    element_tuple_atom(aggregate_id, aggregate_arguments.clone(), tuple)
}

/// One rule per element; the body is the element condition followed by the
/// occurrence dependencies, verbatim.
pub fn encode_aggregate_element(info: &AggregateInfo, element: &AggregateElement) -> Rule {
    let head = build_element_rule_head(info.id(), element, info.arguments());
    let body = element
        .element_literals
        .iter()
        .chain(info.dependencies())
        .cloned()
        .collect();
    Rule::new(head, body)
}

#[cfg(test)]
#[path = "../tests/unit/element_tests.rs"]
mod tests;
