//! Aggregate occurrences and their discovery in a program.
//!
//! Every aggregate literal in a rule or constraint body becomes one
//! [`AggregateInfo`]: a program-unique id, the literal itself, the body literals
//! the aggregate depends on, and the tuple of outer variables it is evaluated
//! under.
//!
//! # Outer context
//!
//! For `big(G) :- group(G), 3 <= #count { X : member(G, X) }.` the element
//! variable `G` also occurs outside the aggregate, so it is *global*:
//!
//! - arguments: `args(G)`
//! - dependencies: `group(G)`
//!
//! Element variables that never leave the aggregate (`X`) are local.
//!
//! A global variable may be bound by a sibling `=` aggregate rather than by an
//! ordinary literal. In `h(N, M) :- N = #count { X : p(X) }, M = #sum { Y : q(Y, N) }.`
//! the `#sum` occurrence depends on `_count_1_result(args, N)`, the atom that
//! replaces the `#count` literal.

use std::collections::HashMap;

use aggrewrite_ast::{
    AggregateElement, AggregateFunction, AggregateLiteral, ComparisonOp, Literal, Program,
    Statement, Symbol, Term,
};
use indexmap::IndexSet;
use tracing::trace;

use crate::internalize::{has_prefix, internal_atom};
use crate::strategy::scoped_result;

/// Functor of the arguments term (`args(X, Y)`)
pub const ARGUMENTS_FUNCTION_SYMBOL: &str = "args";

/// One occurrence of an aggregate literal in one rule body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateInfo {
    id: String,
    literal: AggregateLiteral,
    dependencies: Vec<Literal>,
    arguments: Term,
}

impl AggregateInfo {
    pub fn new(
        id: impl Into<String>,
        literal: AggregateLiteral,
        dependencies: Vec<Literal>,
        arguments: Term,
    ) -> Self {
        AggregateInfo {
            id: id.into(),
            literal,
            dependencies,
            arguments,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn literal(&self) -> &AggregateLiteral {
        &self.literal
    }

    pub fn dependencies(&self) -> &[Literal] {
        &self.dependencies
    }

    pub fn arguments(&self) -> &Term {
        &self.arguments
    }

    pub fn function(&self) -> AggregateFunction {
        self.literal.atom.function
    }

    pub fn operator(&self) -> ComparisonOp {
        self.literal.atom.lower_bound_operator
    }

    pub fn bound(&self) -> &Term {
        &self.literal.atom.lower_bound_term
    }

    pub fn elements(&self) -> &[AggregateElement] {
        &self.literal.atom.elements
    }

    /// `[not] _<id>_result(ARGS, BOUND)`, the literal that takes the
    /// aggregate's place in its rule
    pub fn replacement_literal(&self) -> Literal {
        replacement_literal(&self.id, &self.literal, &self.arguments)
    }

    /// Every variable mentioned by the occurrence; generated variables must avoid these
    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        self.arguments.collect_variables(&mut vars);
        self.bound().collect_variables(&mut vars);
        for literal in &self.dependencies {
            literal.collect_variables(&mut vars);
        }
        vars.extend(self.literal.atom.element_variables());
        vars
    }
}

/// Discovers every aggregate occurrence of a program and assigns ids.
///
/// Ids are `<function>_<n>` drawn from one counter, so they are unique across
/// all functions for the lifetime of the context. A counter value is skipped
/// when its id would scope a predicate the program already uses, so no user
/// predicate ever falls into the namespace of an occurrence.
#[derive(Debug)]
pub struct AggregateRewritingContext {
    next_id: usize,
    occurrences: Vec<AggregateInfo>,
    locations: HashMap<(usize, usize), usize>,
    reserved: IndexSet<Symbol>,
}

impl Default for AggregateRewritingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateRewritingContext {
    pub fn new() -> Self {
        AggregateRewritingContext {
            next_id: 1,
            occurrences: Vec::new(),
            locations: HashMap::new(),
            reserved: IndexSet::new(),
        }
    }

    pub fn from_program(program: &Program) -> Self {
        let mut context = Self::new();
        for statement in &program.statements {
            context.reserve_predicates(statement);
        }
        for (index, statement) in program.statements.iter().enumerate() {
            context.register_statement(index, statement);
        }
        context
    }

    /// All occurrences in discovery order
    pub fn occurrences(&self) -> &[AggregateInfo] {
        &self.occurrences
    }

    /// The occurrence registered for body literal `literal` of statement `statement`
    pub fn occurrence_at(&self, statement: usize, literal: usize) -> Option<&AggregateInfo> {
        self.locations
            .get(&(statement, literal))
            .map(|&index| &self.occurrences[index])
    }

    /// Register every aggregate literal of one statement.
    ///
    /// Predicates of statements registered later are not known yet, so ids
    /// handed out here only avoid the predicates seen so far.
    /// [`from_program`](Self::from_program) reserves the whole program first.
    pub fn register_statement(&mut self, statement_index: usize, statement: &Statement) {
        self.reserve_predicates(statement);

        let body = statement.body();
        let head_vars = statement
            .head()
            .map(|head| head.variables())
            .unwrap_or_default();

        let mut pending = Vec::new();
        let mut replacements: Vec<Option<Literal>> = vec![None; body.len()];
        for (position, literal) in body.iter().enumerate() {
            if let Literal::Aggregate(aggregate) = literal {
                let globals = global_variables(aggregate, position, body, &head_vars);
                let arguments = arguments_term(&globals);
                let id = self.next_id(aggregate.atom.function);
                if !aggregate.negated && aggregate.atom.lower_bound_operator == ComparisonOp::Equal
                {
                    replacements[position] = Some(replacement_literal(&id, aggregate, &arguments));
                }
                pending.push((position, aggregate, id, globals, arguments));
            }
        }

        for (position, aggregate, id, globals, arguments) in pending {
            let bound_vars = aggregate.atom.lower_bound_term.variables();
            let mut seed: IndexSet<Symbol> = globals.into_iter().collect();
            let assigned: IndexSet<Symbol> =
                if aggregate.atom.lower_bound_operator == ComparisonOp::Equal {
                    bound_vars.difference(&seed).copied().collect()
                } else {
                    seed.extend(bound_vars.iter().copied());
                    IndexSet::new()
                };
            let dependencies =
                collect_dependencies(body, &replacements, position, seed, &assigned);

            trace!(
                id = %id,
                statement = statement_index,
                literal = position,
                dependencies = dependencies.len(),
                "registered aggregate occurrence"
            );
            self.locations
                .insert((statement_index, position), self.occurrences.len());
            self.occurrences.push(AggregateInfo::new(
                id,
                aggregate.clone(),
                dependencies,
                arguments,
            ));
        }
    }

    fn reserve_predicates(&mut self, statement: &Statement) {
        self.reserved
            .extend(statement.predicates().into_iter().map(|predicate| predicate.name));
    }

    fn next_id(&mut self, function: AggregateFunction) -> String {
        loop {
            let id = format!("{}_{}", function.name(), self.next_id);
            self.next_id += 1;
            if !self.reserved.iter().any(|name| has_prefix(name, &id)) {
                return id;
            }
            trace!(id = %id, "skipping id that scopes a program predicate");
        }
    }
}

/// Element variables that also occur in the head, another body literal, or
/// (unless the aggregate assigns it) the bound
fn global_variables(
    aggregate: &AggregateLiteral,
    position: usize,
    body: &[Literal],
    head_vars: &IndexSet<Symbol>,
) -> Vec<Symbol> {
    let atom = &aggregate.atom;
    let mut outside: IndexSet<Symbol> = head_vars.clone();
    for (index, literal) in body.iter().enumerate() {
        if index != position {
            literal.collect_variables(&mut outside);
        }
    }
    if atom.lower_bound_operator != ComparisonOp::Equal {
        atom.lower_bound_term.collect_variables(&mut outside);
    }

    atom.element_variables()
        .into_iter()
        .filter(|var| outside.contains(var))
        .collect()
}

fn arguments_term(globals: &[Symbol]) -> Term {
    if globals.is_empty() {
        Term::constant(ARGUMENTS_FUNCTION_SYMBOL)
    } else {
        Term::compound(
            ARGUMENTS_FUNCTION_SYMBOL,
            globals.iter().copied().map(Term::Variable).collect(),
        )
    }
}

/// `[not] _<id>_result(ARGS, BOUND)`
fn replacement_literal(id: &str, aggregate: &AggregateLiteral, arguments: &Term) -> Literal {
    let atom = internal_atom(&scoped_result(
        id,
        arguments,
        &aggregate.atom.lower_bound_term,
    ));
    if aggregate.negated {
        Literal::Negative(atom)
    } else {
        Literal::Positive(atom)
    }
}

/// Body literals that bind the seed variables, closed under variable sharing.
///
/// Positive atoms join when they share a variable with what is already bound;
/// comparisons join only once all their variables are bound. A sibling `=`
/// aggregate joins through its replacement atom, which binds the variable it
/// assigns. Negative literals, other aggregates, the occurrence itself and
/// anything mentioning an `assigned` variable never join. Body order is
/// preserved.
fn collect_dependencies(
    body: &[Literal],
    replacements: &[Option<Literal>],
    position: usize,
    mut bound: IndexSet<Symbol>,
    assigned: &IndexSet<Symbol>,
) -> Vec<Literal> {
    if bound.is_empty() {
        return Vec::new();
    }

    let candidates: Vec<Option<&Literal>> = body
        .iter()
        .zip(replacements)
        .enumerate()
        .map(|(index, (literal, replacement))| match literal {
            _ if index == position => None,
            Literal::Aggregate(_) => replacement.as_ref(),
            Literal::Negative(_) => None,
            other => Some(other),
        })
        .collect();
    let mut selected = vec![false; body.len()];

    loop {
        let mut changed = false;
        for (index, candidate) in candidates.iter().enumerate() {
            let Some(literal) = candidate else { continue };
            if selected[index] {
                continue;
            }
            let vars = literal.variables();
            if vars.iter().any(|var| assigned.contains(var)) {
                continue;
            }
            let joins = match literal {
                Literal::Comparison(_) => {
                    !vars.is_empty() && vars.iter().all(|var| bound.contains(var))
                }
                _ => vars.iter().any(|var| bound.contains(var)),
            };
            if joins {
                selected[index] = true;
                bound.extend(vars);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    candidates
        .into_iter()
        .zip(selected)
        .filter_map(|(candidate, chosen)| candidate.filter(|_| chosen).cloned())
        .collect()
}

#[cfg(test)]
#[path = "../tests/unit/context_tests.rs"]
mod tests;
