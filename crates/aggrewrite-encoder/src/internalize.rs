//! Moving generated predicates into the internal namespace.
//!
//! Predicates synthesized for one aggregate occurrence are named
//! `<id>_<suffix>` and are defined by the occurrence's fragment. Internalization
//! prepends [`INTERNAL_PREFIX`] to exactly those names. A user predicate that
//! happens to share the scope prefix is only ever read by the fragment, never
//! defined by it, and keeps its name. The parser rejects internal names, so no
//! user rule can read or define the renamed predicates.

use aggrewrite_ast::{Atom, ProgramFragment, Rule, Symbol, INTERNAL_PREFIX};
use indexmap::IndexSet;
use internment::Intern;

/// Internalize every predicate that `fragment` defines under `prefix`.
///
/// Rules keep their order and facts keep their insertion order. Applying the
/// function twice gives the same result as applying it once.
pub fn make_prefixed_predicates_internal(fragment: ProgramFragment, prefix: &str) -> ProgramFragment {
    let scope = synthesized_predicates(&fragment, prefix);
    if scope.is_empty() {
        return fragment;
    }
    let rules = fragment
        .rules
        .iter()
        .map(|rule| make_rule_internal(rule, &scope))
        .collect();
    let facts = fragment
        .facts
        .iter()
        .map(|atom| make_atom_internal(atom, &scope))
        .collect();
    ProgramFragment::new_with(rules, facts)
}

/// Names under `prefix` that `fragment` defines through a fact or a rule head
pub fn synthesized_predicates(fragment: &ProgramFragment, prefix: &str) -> IndexSet<Symbol> {
    debug_assert!(
        !prefix.starts_with(INTERNAL_PREFIX),
        "scope prefix {prefix:?} is already internal"
    );
    fragment
        .head_predicates()
        .into_iter()
        .map(|predicate| predicate.name)
        .filter(|name| has_prefix(name, prefix))
        .collect()
}

/// Internalize the head and every body atom of `rule` named in `scope`,
/// aggregate elements included
pub fn make_rule_internal(rule: &Rule, scope: &IndexSet<Symbol>) -> Rule {
    rule.map_atoms(&|atom: &Atom| make_atom_internal(atom, scope))
}

pub fn make_atom_internal(atom: &Atom, scope: &IndexSet<Symbol>) -> Atom {
    if scope.contains(&atom.predicate) {
        internal_atom(atom)
    } else {
        atom.clone()
    }
}

/// `atom` with its predicate moved into the internal namespace
pub fn internal_atom(atom: &Atom) -> Atom {
    if atom.is_internal() {
        return atom.clone();
    }
    Atom {
        predicate: Intern::new(format!("{}{}", INTERNAL_PREFIX, atom.predicate)),
        terms: atom.terms.clone(),
    }
}

/// `count_1` matches `count_1` and `count_1_value`, but not `count_10_value`
pub(crate) fn has_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('_'),
        None => false,
    }
}

#[cfg(test)]
#[path = "../tests/unit/internalize_tests.rs"]
mod tests;
