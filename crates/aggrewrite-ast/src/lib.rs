//! Abstract Syntax Tree (AST) definitions for aggregate rewriting
//!
//! This crate defines the data structures representing an Answer Set Programming
//! program before and after its aggregate literals are rewritten.
//!
//! # Key Components
//!
//! - **Program**: A collection of statements (facts, rules, constraints)
//! - **ProgramFragment**: Rules and facts generated for one or more aggregate occurrences
//! - **Atom**: Predicate applied to terms (e.g., `edge(a, b)`)
//! - **Term**: Variables, constants, or compound terms (arithmetic is a compound)
//! - **Literal**: Positive/negative atoms, comparisons, and aggregate literals
//! - **AggregateAtom**: `B op #count { X : p(X) }`, always stored in lower-bound form
//!
//! # Example
//!
//! ```ignore
//! // A simple fact: edge(a, b).
//! let fact = Fact {
//!     atom: Atom {
//!         predicate: Intern::new("edge".to_string()),
//!         terms: vec![
//!             Term::Constant(Value::Atom(Intern::new("a".to_string()))),
//!             Term::Constant(Value::Atom(Intern::new("b".to_string()))),
//!         ],
//!     },
//! };
//! ```

mod display;
mod fragment;

use indexmap::IndexSet;
use internment::Intern;

pub use fragment::ProgramFragment;

/// Interned string for efficient storage and comparison
pub type Symbol = Intern<String>;

/// Predicates whose name starts with this prefix are internal to the rewriting
/// and cannot be written in program text.
pub const INTERNAL_PREFIX: &str = "_";

/// Functors that are rendered as infix arithmetic
pub const ARITHMETIC_FUNCTORS: [&str; 5] = ["+", "-", "*", "/", MODULO_FUNCTOR];

/// Functor of integer modulo; written `\` in program text
pub const MODULO_FUNCTOR: &str = "mod";

/// A program consists of facts, rules and constraints
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Fact(Fact),
    Rule(Rule),
    Constraint(Constraint),
}

/// A fact is simply an atom: `edge(a, b).`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fact {
    pub atom: Atom,
}

/// A rule has a head and a body: `reach(X, Y) :- edge(X, Y).`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Literal>,
}

/// A constraint has no head, only a body: `:- unsafe(X).`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraint {
    pub body: Vec<Literal>,
}

/// A literal is a positive or negative atom, a comparison, or an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    /// Positive atom: `edge(X, Y)`
    Positive(Atom),
    /// Negated atom: `not edge(X, Y)`
    Negative(Atom),
    /// Comparison: `X > 5`, `K1 = K + 1`
    Comparison(ComparisonLiteral),
    /// Aggregate: `2 <= #count { X : p(X) }`
    Aggregate(AggregateLiteral),
}

/// A comparison literal for built-in predicates
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonLiteral {
    pub left: Term,
    pub op: ComparisonOp,
    pub right: Term,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComparisonOp {
    Equal,          // =
    NotEqual,       // !=
    LessThan,       // <
    LessOrEqual,    // <=
    GreaterThan,    // >
    GreaterOrEqual, // >=
}

/// An aggregate literal, possibly default-negated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateLiteral {
    pub atom: AggregateAtom,
    pub negated: bool,
}

/// An aggregate atom in lower-bound form: `lower_bound_term op #function { elements }`
///
/// A trailing bound (`#count { ... } > 2`) is normalized by the parser into
/// `2 < #count { ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateAtom {
    pub function: AggregateFunction,
    pub lower_bound_operator: ComparisonOp,
    pub lower_bound_term: Term,
    pub elements: Vec<AggregateElement>,
}

/// One element of an aggregate: `X, Y : p(X, Y), not q(X)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateElement {
    pub element_terms: Vec<Term>,
    pub element_literals: Vec<Literal>,
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AggregateFunction {
    Count,
    Sum,
    Min,
    Max,
}

/// An atom is a predicate applied to terms: `edge(a, b)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    pub predicate: Symbol,
    pub terms: Vec<Term>,
}

/// Name and arity of an atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub name: Symbol,
    pub arity: usize,
}

/// A term can be a variable, constant, or compound term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    /// Variable: uppercase or starts with underscore (X, Y, _tmp)
    Variable(Symbol),
    /// Constant: integer, string, or lowercase identifier
    Constant(Value),
    /// Compound term: functor with arguments (f(a, b), X + 1)
    Compound(Symbol, Vec<Term>),
}

/// Constant values
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(Symbol),
    Atom(Symbol),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Atom(a), Value::Atom(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::Integer(i) => {
                0u8.hash(state);
                i.hash(state);
            }
            Value::Float(f) => {
                1u8.hash(state);
                // Hash the bit representation of the float for consistency
                f.to_bits().hash(state);
            }
            Value::Boolean(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            Value::String(s) => {
                3u8.hash(state);
                s.hash(state);
            }
            Value::Atom(a) => {
                4u8.hash(state);
                a.hash(state);
            }
        }
    }
}

impl Program {
    /// Create a new empty program
    pub fn new() -> Self {
        Program {
            statements: Vec::new(),
        }
    }

    /// Add a statement to the program
    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Check whether any rule or constraint body contains an aggregate literal
    pub fn has_aggregates(&self) -> bool {
        self.statements.iter().any(|statement| {
            statement
                .body()
                .iter()
                .any(|literal| matches!(literal, Literal::Aggregate(_)))
        })
    }
}

impl Statement {
    /// Body literals of a rule or constraint; facts have none
    pub fn body(&self) -> &[Literal] {
        match self {
            Statement::Fact(_) => &[],
            Statement::Rule(rule) => &rule.body,
            Statement::Constraint(constraint) => &constraint.body,
        }
    }

    /// Head atom of a fact or rule; constraints have none
    pub fn head(&self) -> Option<&Atom> {
        match self {
            Statement::Fact(fact) => Some(&fact.atom),
            Statement::Rule(rule) => Some(&rule.head),
            Statement::Constraint(_) => None,
        }
    }

    /// Predicates of the head and of every body atom, aggregate elements included
    pub fn predicates(&self) -> IndexSet<Predicate> {
        let mut predicates = IndexSet::new();
        if let Some(head) = self.head() {
            predicates.insert(head.signature());
        }
        for literal in self.body() {
            literal.collect_predicates(&mut predicates);
        }
        predicates
    }
}

impl Rule {
    pub fn new(head: Atom, body: Vec<Literal>) -> Self {
        Rule { head, body }
    }

    /// Rebuild the rule with every atom (head, body, aggregate elements) passed through `f`
    pub fn map_atoms<F>(&self, f: &F) -> Rule
    where
        F: Fn(&Atom) -> Atom,
    {
        Rule {
            head: f(&self.head),
            body: self.body.iter().map(|literal| literal.map_atoms(f)).collect(),
        }
    }

    /// Predicates of the head and of every body atom, in first-occurrence order
    pub fn predicates(&self) -> IndexSet<Predicate> {
        let mut predicates = IndexSet::new();
        predicates.insert(self.head.signature());
        for literal in &self.body {
            literal.collect_predicates(&mut predicates);
        }
        predicates
    }
}

impl Literal {
    /// Get the underlying atom from a literal (None for comparisons and aggregates)
    pub fn atom(&self) -> Option<&Atom> {
        match self {
            Literal::Positive(atom) | Literal::Negative(atom) => Some(atom),
            Literal::Comparison(_) | Literal::Aggregate(_) => None,
        }
    }

    /// Check if the literal is positive
    pub fn is_positive(&self) -> bool {
        matches!(self, Literal::Positive(_))
    }

    /// Check if the literal is negative
    pub fn is_negative(&self) -> bool {
        matches!(self, Literal::Negative(_))
    }

    /// Check if the literal is an aggregate
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Literal::Aggregate(_))
    }

    /// Variables visible to the enclosing rule.
    ///
    /// Variables that only occur inside aggregate elements are local to the
    /// aggregate and are not reported; only the bound term counts.
    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Symbol>) {
        match self {
            Literal::Positive(atom) | Literal::Negative(atom) => atom.collect_variables(vars),
            Literal::Comparison(comparison) => {
                comparison.left.collect_variables(vars);
                comparison.right.collect_variables(vars);
            }
            Literal::Aggregate(aggregate) => {
                aggregate.atom.lower_bound_term.collect_variables(vars)
            }
        }
    }

    /// Rebuild the literal with every atom passed through `f`
    pub fn map_atoms<F>(&self, f: &F) -> Literal
    where
        F: Fn(&Atom) -> Atom,
    {
        match self {
            Literal::Positive(atom) => Literal::Positive(f(atom)),
            Literal::Negative(atom) => Literal::Negative(f(atom)),
            Literal::Comparison(comparison) => Literal::Comparison(comparison.clone()),
            Literal::Aggregate(aggregate) => Literal::Aggregate(AggregateLiteral {
                atom: AggregateAtom {
                    elements: aggregate
                        .atom
                        .elements
                        .iter()
                        .map(|element| AggregateElement {
                            element_terms: element.element_terms.clone(),
                            element_literals: element
                                .element_literals
                                .iter()
                                .map(|literal| literal.map_atoms(f))
                                .collect(),
                        })
                        .collect(),
                    ..aggregate.atom.clone()
                },
                negated: aggregate.negated,
            }),
        }
    }

    fn collect_predicates(&self, predicates: &mut IndexSet<Predicate>) {
        match self {
            Literal::Positive(atom) | Literal::Negative(atom) => {
                predicates.insert(atom.signature());
            }
            Literal::Comparison(_) => {}
            Literal::Aggregate(aggregate) => {
                for element in &aggregate.atom.elements {
                    for literal in &element.element_literals {
                        literal.collect_predicates(predicates);
                    }
                }
            }
        }
    }
}

impl ComparisonLiteral {
    pub fn new(left: Term, op: ComparisonOp, right: Term) -> Self {
        ComparisonLiteral { left, op, right }
    }
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Equal,
        ComparisonOp::NotEqual,
        ComparisonOp::LessThan,
        ComparisonOp::LessOrEqual,
        ComparisonOp::GreaterThan,
        ComparisonOp::GreaterOrEqual,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterOrEqual => ">=",
        }
    }

    /// Operator with its operands swapped: `a < b` holds iff `b > a`
    pub fn flip(self) -> Self {
        match self {
            ComparisonOp::Equal => ComparisonOp::Equal,
            ComparisonOp::NotEqual => ComparisonOp::NotEqual,
            ComparisonOp::LessThan => ComparisonOp::GreaterThan,
            ComparisonOp::LessOrEqual => ComparisonOp::GreaterOrEqual,
            ComparisonOp::GreaterThan => ComparisonOp::LessThan,
            ComparisonOp::GreaterOrEqual => ComparisonOp::LessOrEqual,
        }
    }

    /// Complementary operator: `a < b` is false iff `a >= b`
    pub fn negate(self) -> Self {
        match self {
            ComparisonOp::Equal => ComparisonOp::NotEqual,
            ComparisonOp::NotEqual => ComparisonOp::Equal,
            ComparisonOp::LessThan => ComparisonOp::GreaterOrEqual,
            ComparisonOp::LessOrEqual => ComparisonOp::GreaterThan,
            ComparisonOp::GreaterThan => ComparisonOp::LessOrEqual,
            ComparisonOp::GreaterOrEqual => ComparisonOp::LessThan,
        }
    }
}

impl AggregateFunction {
    pub const ALL: [AggregateFunction; 4] = [
        AggregateFunction::Count,
        AggregateFunction::Sum,
        AggregateFunction::Min,
        AggregateFunction::Max,
    ];

    /// Lowercase name used in generated identifiers (`count_1`)
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Count => "count",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Min => "min",
            AggregateFunction::Max => "max",
        }
    }
}

impl AggregateElement {
    pub fn new(element_terms: Vec<Term>, element_literals: Vec<Literal>) -> Self {
        AggregateElement {
            element_terms,
            element_literals,
        }
    }

    /// Every variable of the element, terms first, in first-occurrence order
    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        for term in &self.element_terms {
            term.collect_variables(&mut vars);
        }
        for literal in &self.element_literals {
            literal.collect_variables(&mut vars);
        }
        vars
    }
}

impl AggregateAtom {
    /// Variables occurring anywhere in the elements
    pub fn element_variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        for element in &self.elements {
            vars.extend(element.variables());
        }
        vars
    }
}

impl Atom {
    pub fn new(predicate: &str, terms: Vec<Term>) -> Self {
        Atom {
            predicate: Intern::new(predicate.to_string()),
            terms,
        }
    }

    pub fn signature(&self) -> Predicate {
        Predicate {
            name: self.predicate,
            arity: self.terms.len(),
        }
    }

    /// Check whether the predicate lives in the internal namespace
    pub fn is_internal(&self) -> bool {
        self.predicate.starts_with(INTERNAL_PREFIX)
    }

    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Symbol>) {
        for term in &self.terms {
            term.collect_variables(vars);
        }
    }
}

impl Term {
    pub fn variable(name: &str) -> Self {
        Term::Variable(Intern::new(name.to_string()))
    }

    pub fn integer(value: i64) -> Self {
        Term::Constant(Value::Integer(value))
    }

    pub fn constant(name: &str) -> Self {
        Term::Constant(Value::Atom(Intern::new(name.to_string())))
    }

    pub fn compound(functor: &str, args: Vec<Term>) -> Self {
        Term::Compound(Intern::new(functor.to_string()), args)
    }

    /// Arithmetic term `left op right`, e.g. `K + 1`
    pub fn arithmetic(op: &str, left: Term, right: Term) -> Self {
        Term::compound(op, vec![left, right])
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Term::Compound(functor, args)
            if args.len() == 2 && ARITHMETIC_FUNCTORS.contains(&functor.as_str()))
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Compound(_, args) => args.iter().all(Term::is_ground),
        }
    }

    pub fn variables(&self) -> IndexSet<Symbol> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Symbol>) {
        match self {
            Term::Variable(var) => {
                vars.insert(*var);
            }
            Term::Constant(_) => {}
            Term::Compound(_functor, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/ast_tests.rs"]
mod tests;
