//! Anonymous variables.
//!
//! Every `_` in a statement is a variable of its own. After a statement is
//! parsed each `_` is renamed to `_AnonN`, picking the smallest `N` no other
//! variable of the statement uses. Two `_` never share a name, so none of
//! them can join two literals or leak out of an aggregate element.

use std::collections::HashSet;

use aggrewrite_ast::{Atom, Literal, Statement, Symbol, Term};
use internment::Intern;

pub(crate) const ANONYMOUS_VARIABLE: &str = "_";

pub(crate) fn name_anonymous_variables(mut statement: Statement) -> Statement {
    match &mut statement {
        Statement::Fact(fact) => name_in(Some(&mut fact.atom), &mut []),
        Statement::Rule(rule) => name_in(Some(&mut rule.head), &mut rule.body),
        Statement::Constraint(constraint) => name_in(None, &mut constraint.body),
    }
    statement
}

pub(crate) fn name_anonymous_in_body(mut body: Vec<Literal>) -> Vec<Literal> {
    name_in(None, &mut body);
    body
}

fn name_in(mut head: Option<&mut Atom>, body: &mut [Literal]) {
    let mut taken: HashSet<Symbol> = HashSet::new();
    let mut anonymous = 0usize;
    visit(head.as_deref_mut(), body, &mut |var| {
        if var.as_str() == ANONYMOUS_VARIABLE {
            anonymous += 1;
        } else {
            taken.insert(*var);
        }
    });
    if anonymous == 0 {
        return;
    }

    let mut counter = 0usize;
    visit(head, body, &mut |var| {
        if var.as_str() == ANONYMOUS_VARIABLE {
            *var = loop {
                counter += 1;
                let candidate = Intern::new(format!("_Anon{}", counter));
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };
        }
    });
}

fn visit(head: Option<&mut Atom>, body: &mut [Literal], f: &mut dyn FnMut(&mut Symbol)) {
    if let Some(atom) = head {
        visit_atom(atom, f);
    }
    for literal in body {
        visit_literal(literal, f);
    }
}

fn visit_literal(literal: &mut Literal, f: &mut dyn FnMut(&mut Symbol)) {
    match literal {
        Literal::Positive(atom) | Literal::Negative(atom) => visit_atom(atom, f),
        Literal::Comparison(comparison) => {
            visit_term(&mut comparison.left, f);
            visit_term(&mut comparison.right, f);
        }
        Literal::Aggregate(aggregate) => {
            visit_term(&mut aggregate.atom.lower_bound_term, f);
            for element in &mut aggregate.atom.elements {
                for term in &mut element.element_terms {
                    visit_term(term, f);
                }
                for literal in &mut element.element_literals {
                    visit_literal(literal, f);
                }
            }
        }
    }
}

fn visit_atom(atom: &mut Atom, f: &mut dyn FnMut(&mut Symbol)) {
    for term in &mut atom.terms {
        visit_term(term, f);
    }
}

fn visit_term(term: &mut Term, f: &mut dyn FnMut(&mut Symbol)) {
    match term {
        Term::Variable(var) => f(var),
        Term::Constant(_) => {}
        Term::Compound(_, args) => {
            for arg in args {
                visit_term(arg, f);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/anonymous_tests.rs"]
mod tests;
