//! `#min` and `#max`: the weight of a tuple no other tuple beats.
//!
//! An empty group has no value, so its `<id>_result` atom is never derived.

use aggrewrite_ast::{AggregateFunction, ComparisonOp, ProgramFragment, Rule};

use super::{compare, negative, positive, result_rule, scoped, var, weight_rules, VALUE, WEIGHT};
use crate::context::AggregateInfo;
use crate::error::EncodingError;

const DOMINATED: &str = "dominated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extremum {
    Min,
    Max,
}

impl Extremum {
    fn function(self) -> AggregateFunction {
        match self {
            Extremum::Min => AggregateFunction::Min,
            Extremum::Max => AggregateFunction::Max,
        }
    }

    /// How the challenger weight `W2` beats `W`
    fn beats(self) -> ComparisonOp {
        match self {
            Extremum::Min => ComparisonOp::LessThan,
            Extremum::Max => ComparisonOp::GreaterThan,
        }
    }
}

pub(crate) fn encode(
    info: &AggregateInfo,
    extremum: Extremum,
) -> Result<ProgramFragment, EncodingError> {
    let id = info.id();
    let mut rules = weight_rules(info, extremum.function())?;

    rules.push(Rule::new(
        scoped(id, DOMINATED, vec![var("A"), var("T")]),
        vec![
            positive(scoped(id, WEIGHT, vec![var("A"), var("T"), var("W")])),
            positive(scoped(id, WEIGHT, vec![var("A"), var("T2"), var("W2")])),
            compare(var("W2"), extremum.beats(), var("W")),
        ],
    ));
    rules.push(Rule::new(
        scoped(id, VALUE, vec![var("A"), var("W")]),
        vec![
            positive(scoped(id, WEIGHT, vec![var("A"), var("T"), var("W")])),
            negative(scoped(id, DOMINATED, vec![var("A"), var("T")])),
        ],
    ));
    rules.push(result_rule(info));

    Ok(ProgramFragment::from_rules(rules))
}
