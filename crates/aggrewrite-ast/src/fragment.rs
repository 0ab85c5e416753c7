//! Program fragments produced by the aggregate encoders.

use std::fmt;

use indexmap::IndexSet;

use crate::{Atom, Fact, Predicate, Program, Rule, Statement};

/// An ordered list of rules plus a set of facts.
///
/// Fragments never carry directives. Merging concatenates rules and unions
/// facts, so it is associative and fragments with disjoint predicates can be
/// merged in any order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgramFragment {
    pub rules: Vec<Rule>,
    pub facts: IndexSet<Atom>,
}

impl ProgramFragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<Rule>) -> Self {
        ProgramFragment {
            rules,
            facts: IndexSet::new(),
        }
    }

    pub fn new_with(rules: Vec<Rule>, facts: IndexSet<Atom>) -> Self {
        ProgramFragment { rules, facts }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.facts.is_empty()
    }

    /// Append the rules and facts of `other` to this fragment
    pub fn accumulate(&mut self, other: ProgramFragment) {
        self.rules.extend(other.rules);
        self.facts.extend(other.facts);
    }

    pub fn merge(mut self, other: ProgramFragment) -> ProgramFragment {
        self.accumulate(other);
        self
    }

    /// Every predicate mentioned by a fact, rule head or rule body
    pub fn predicates(&self) -> IndexSet<Predicate> {
        let mut predicates: IndexSet<Predicate> =
            self.facts.iter().map(Atom::signature).collect();
        for rule in &self.rules {
            predicates.extend(rule.predicates());
        }
        predicates
    }

    /// Predicates defined by this fragment (fact and rule-head predicates)
    pub fn head_predicates(&self) -> IndexSet<Predicate> {
        self.facts
            .iter()
            .chain(self.rules.iter().map(|rule| &rule.head))
            .map(Atom::signature)
            .collect()
    }

    /// Statements of the fragment: facts first, then rules in order
    pub fn into_statements(self) -> Vec<Statement> {
        let mut statements: Vec<Statement> = self
            .facts
            .into_iter()
            .map(|atom| Statement::Fact(Fact { atom }))
            .collect();
        statements.extend(self.rules.into_iter().map(Statement::Rule));
        statements
    }

    pub fn into_program(self) -> Program {
        Program {
            statements: self.into_statements(),
        }
    }
}

impl FromIterator<ProgramFragment> for ProgramFragment {
    fn from_iter<I: IntoIterator<Item = ProgramFragment>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ProgramFragment::new(), ProgramFragment::merge)
    }
}

impl fmt::Display for ProgramFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fact in &self.facts {
            writeln!(f, "{}.", fact)?;
        }
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
