//! Result encodings, one per aggregate function.
//!
//! Every strategy reads `<id>_element_tuple(ARGS, TUPLE)` and derives
//!
//! - `<id>_value(ARGS, V)`: the aggregate value under one binding of the outer
//!   variables
//! - `<id>_result(ARGS, BOUND)`: holds iff `BOUND op V`
//!
//! `<id>_result` is the atom that replaces the aggregate literal in the
//! rewritten rule. Predicate names only depend on the occurrence id, and no
//! rule is internalized here.

mod count;
mod min_max;
mod ordering;
mod sum;

use aggrewrite_ast::{
    AggregateFunction, Atom, ComparisonLiteral, ComparisonOp, Literal, ProgramFragment, Rule,
    Symbol, Term,
};
use indexmap::IndexSet;

use crate::context::AggregateInfo;
use crate::error::EncodingError;

pub(crate) const VALUE: &str = "value";
pub(crate) const RESULT: &str = "result";
pub(crate) const WEIGHT: &str = "weight";

/// Produce the result-encoding rules of one occurrence of `function`
pub fn encode_result(
    function: AggregateFunction,
    info: &AggregateInfo,
) -> Result<ProgramFragment, EncodingError> {
    let fragment = match function {
        AggregateFunction::Count => count::encode(info),
        AggregateFunction::Sum => sum::encode(info)?,
        AggregateFunction::Min => min_max::encode(info, min_max::Extremum::Min)?,
        AggregateFunction::Max => min_max::encode(info, min_max::Extremum::Max)?,
    };
    Ok(fragment)
}

/// The atom standing in for the aggregate literal, before internalization
pub fn result_atom(info: &AggregateInfo) -> Atom {
    scoped_result(info.id(), info.arguments(), info.bound())
}

/// `<id>_result(ARGS, BOUND)`
pub(crate) fn scoped_result(id: &str, arguments: &Term, bound: &Term) -> Atom {
    scoped(id, RESULT, vec![arguments.clone(), bound.clone()])
}

/// `<id>_<suffix>(terms)`
pub(crate) fn scoped(id: &str, suffix: &str, terms: Vec<Term>) -> Atom {
    Atom::new(&format!("{}_{}", id, suffix), terms)
}

pub(crate) fn var(name: &str) -> Term {
    Term::variable(name)
}

pub(crate) fn positive(atom: Atom) -> Literal {
    Literal::Positive(atom)
}

pub(crate) fn negative(atom: Atom) -> Literal {
    Literal::Negative(atom)
}

pub(crate) fn compare(left: Term, op: ComparisonOp, right: Term) -> Literal {
    Literal::Comparison(ComparisonLiteral::new(left, op, right))
}

/// A variable named `base`, or `base` with the smallest numeric suffix not in `taken`
pub fn fresh_variable(base: &str, taken: &IndexSet<Symbol>) -> Term {
    let is_taken = |name: &str| taken.iter().any(|var| var.as_str() == name);
    if !is_taken(base) {
        return Term::variable(base);
    }
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{}{}", base, suffix);
        if !is_taken(&candidate) {
            return Term::variable(&candidate);
        }
        suffix += 1;
    }
}

/// `<id>_result` from `<id>_value`.
///
/// For `=` the bound is matched directly against the value, so an unbound
/// bound variable receives the value. Any other operator compares through a
/// fresh variable and repeats the dependencies so the bound is safe.
pub(crate) fn result_rule(info: &AggregateInfo) -> Rule {
    let id = info.id();
    if info.operator() == ComparisonOp::Equal {
        return Rule::new(
            scoped(id, RESULT, vec![var("A"), var("V")]),
            vec![positive(scoped(id, VALUE, vec![var("A"), var("V")]))],
        );
    }

    let value = fresh_variable("V", &info.variables());
    let mut body = vec![
        positive(scoped(
            id,
            VALUE,
            vec![info.arguments().clone(), value.clone()],
        )),
        compare(info.bound().clone(), info.operator(), value),
    ];
    body.extend(info.dependencies().iter().cloned());
    Rule::new(result_atom(info), body)
}

/// `<id>_value(ARGS, 0) :- deps, not <id>_has_tuple(ARGS).`
pub(crate) fn empty_value_rule(info: &AggregateInfo) -> Rule {
    let id = info.id();
    let mut body: Vec<Literal> = info.dependencies().to_vec();
    body.push(negative(scoped(
        id,
        ordering::HAS_TUPLE,
        vec![info.arguments().clone()],
    )));
    Rule::new(
        scoped(id, VALUE, vec![info.arguments().clone(), Term::integer(0)]),
        body,
    )
}

/// One `<id>_weight(A, T, W)` rule per distinct element arity; the first
/// element term is the weight.
pub(crate) fn weight_rules(
    info: &AggregateInfo,
    function: AggregateFunction,
) -> Result<Vec<Rule>, EncodingError> {
    let mut arities = IndexSet::new();
    for (index, element) in info.elements().iter().enumerate() {
        if element.element_terms.is_empty() {
            return Err(EncodingError::MissingWeight {
                id: info.id().to_string(),
                function,
                index,
            });
        }
        arities.insert(element.element_terms.len());
    }

    let id = info.id();
    Ok(arities
        .into_iter()
        .map(|arity| {
            let mut terms = vec![var("W")];
            terms.extend((2..=arity).map(|position| var(&format!("X{}", position))));
            let tuple = Term::compound(crate::element::ELEMENT_TUPLE_FUNCTION_SYMBOL, terms);
            Rule::new(
                scoped(id, WEIGHT, vec![var("A"), tuple.clone(), var("W")]),
                vec![positive(crate::element::element_tuple_atom(
                    id,
                    var("A"),
                    tuple,
                ))],
            )
        })
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/strategy_tests.rs"]
mod tests;
