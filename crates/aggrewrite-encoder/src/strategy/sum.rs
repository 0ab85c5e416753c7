//! `#sum`: prefix sums of the weights along the chain.
//!
//! Weights must be integers; a tuple with a symbolic weight leaves the sum of
//! its group undefined.

use aggrewrite_ast::{AggregateFunction, ComparisonOp, ProgramFragment, Rule, Term};

use super::ordering::{self, chain_rules};
use super::{compare, empty_value_rule, positive, result_rule, scoped, var, weight_rules};
use super::{VALUE, WEIGHT};
use crate::context::AggregateInfo;
use crate::error::EncodingError;

const PARTIAL: &str = "partial";

pub(crate) fn encode(info: &AggregateInfo) -> Result<ProgramFragment, EncodingError> {
    let id = info.id();
    let mut rules = weight_rules(info, AggregateFunction::Sum)?;
    rules.extend(chain_rules(id));

    let weight = |t: &str, w: &str| positive(scoped(id, WEIGHT, vec![var("A"), var(t), var(w)]));

    let mut first = ordering::first(id, "T");
    first.push(weight("T", "W"));
    rules.push(Rule::new(
        scoped(id, PARTIAL, vec![var("A"), var("T"), var("W")]),
        first,
    ));
    rules.push(Rule::new(
        scoped(id, PARTIAL, vec![var("A"), var("T2"), var("S1")]),
        vec![
            positive(scoped(id, PARTIAL, vec![var("A"), var("T1"), var("S")])),
            ordering::next(id, "T1", "T2"),
            weight("T2", "W"),
            compare(
                var("S1"),
                ComparisonOp::Equal,
                Term::arithmetic("+", var("S"), var("W")),
            ),
        ],
    ));
    rules.push(Rule::new(
        scoped(id, VALUE, vec![var("A"), var("S")]),
        vec![
            positive(scoped(id, PARTIAL, vec![var("A"), var("T"), var("S")])),
            ordering::is_last(id, "T"),
        ],
    ));
    rules.push(empty_value_rule(info));
    rules.push(result_rule(info));

    Ok(ProgramFragment::from_rules(rules))
}
