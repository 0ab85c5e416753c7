//! Naive stratified evaluation of aggregate-free programs.
//!
//! Good enough to run rewritten programs over a handful of facts and read off
//! what they derive. Constraints are ignored and every rule must be safe.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use aggrewrite_ast::{
    Atom, ComparisonLiteral, ComparisonOp, Literal, Program, Rule, Statement, Symbol, Term, Value,
    MODULO_FUNCTOR,
};

pub type Substitution = HashMap<Symbol, Term>;

#[derive(Debug, Default)]
pub struct FactDatabase {
    facts: HashMap<Symbol, HashSet<Vec<Term>>>,
}

impl FactDatabase {
    pub fn insert(&mut self, atom: Atom) -> bool {
        self.facts.entry(atom.predicate).or_default().insert(atom.terms)
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.facts
            .get(&atom.predicate)
            .is_some_and(|tuples| tuples.contains(&atom.terms))
    }

    fn tuples(&self, predicate: &Symbol) -> Vec<Vec<Term>> {
        self.facts
            .get(predicate)
            .map(|tuples| tuples.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.facts.values().map(HashSet::len).sum()
    }

    /// Every derived atom of `predicate`, rendered and sorted
    pub fn rendered(&self, predicate: &str) -> Vec<String> {
        let mut atoms: Vec<String> = self
            .facts
            .iter()
            .filter(|(name, _)| name.as_str() == predicate)
            .flat_map(|(name, tuples)| {
                tuples
                    .iter()
                    .map(move |terms| Atom { predicate: *name, terms: terms.clone() }.to_string())
            })
            .collect();
        atoms.sort();
        atoms
    }

    pub fn holds(&self, predicate: &str) -> bool {
        self.contains(&Atom::new(predicate, vec![]))
    }
}

/// Evaluate `program` bottom-up, one stratum at a time
pub fn evaluate(program: &Program) -> FactDatabase {
    let mut db = FactDatabase::default();
    let mut rules = Vec::new();
    for statement in &program.statements {
        match statement {
            Statement::Fact(fact) => {
                db.insert(fact.atom.clone());
            }
            Statement::Rule(rule) => rules.push(rule.clone()),
            Statement::Constraint(_) => {}
        }
    }

    for stratum in stratify(&rules) {
        naive_evaluation(&stratum, &mut db);
    }
    db
}

/// Rules grouped by stratum; negation only reaches into lower strata
fn stratify(rules: &[Rule]) -> Vec<Vec<Rule>> {
    let mut strata: HashMap<Symbol, usize> = HashMap::new();
    for rule in rules {
        strata.insert(rule.head.predicate, 0);
    }

    let limit = strata.len() + 1;
    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            let mut required = 0;
            for literal in &rule.body {
                match literal {
                    Literal::Positive(atom) => {
                        required = required.max(*strata.get(&atom.predicate).unwrap_or(&0));
                    }
                    Literal::Negative(atom) => {
                        required = required.max(strata.get(&atom.predicate).map_or(0, |s| s + 1));
                    }
                    Literal::Comparison(_) => {}
                    Literal::Aggregate(_) => panic!("aggregates must be rewritten first"),
                }
            }
            let current = strata.entry(rule.head.predicate).or_insert(0);
            if required > *current {
                assert!(required <= limit, "program is not stratified");
                *current = required;
                changed = true;
            }
        }
    }

    let count = strata.values().max().map_or(0, |max| max + 1);
    let mut by_stratum = vec![Vec::new(); count];
    for rule in rules {
        by_stratum[strata[&rule.head.predicate]].push(rule.clone());
    }
    by_stratum
}

fn naive_evaluation(rules: &[Rule], db: &mut FactDatabase) {
    loop {
        let before = db.len();
        for rule in rules {
            for fact in ground_rule(rule, db) {
                db.insert(fact);
            }
        }
        if db.len() == before {
            break;
        }
    }
}

fn ground_rule(rule: &Rule, db: &FactDatabase) -> Vec<Atom> {
    let pending: Vec<&Literal> = rule.body.iter().collect();
    let mut solutions = Vec::new();
    solve(&pending, Substitution::new(), db, &mut solutions);
    solutions
        .iter()
        .map(|subst| Atom {
            predicate: rule.head.predicate,
            terms: rule
                .head
                .terms
                .iter()
                .map(|term| {
                    instantiate(term, subst)
                        .unwrap_or_else(|| panic!("unsafe head in rule {}", rule))
                })
                .collect(),
        })
        .collect()
}

fn solve(pending: &[&Literal], subst: Substitution, db: &FactDatabase, out: &mut Vec<Substitution>) {
    if pending.is_empty() {
        out.push(subst);
        return;
    }
    let index = pending
        .iter()
        .position(|literal| is_ready(literal, &subst))
        .unwrap_or_else(|| panic!("no literal can be evaluated among {:?}", pending));
    let rest: Vec<&Literal> = pending
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != index)
        .map(|(_, literal)| *literal)
        .collect();

    match pending[index] {
        Literal::Positive(atom) => {
            for tuple in db.tuples(&atom.predicate) {
                if tuple.len() != atom.terms.len() {
                    continue;
                }
                let mut extended = subst.clone();
                if atom
                    .terms
                    .iter()
                    .zip(&tuple)
                    .all(|(pattern, value)| unify(pattern, value, &mut extended))
                {
                    solve(&rest, extended, db, out);
                }
            }
        }
        Literal::Negative(atom) => {
            let ground: Option<Vec<Term>> =
                atom.terms.iter().map(|term| instantiate(term, &subst)).collect();
            let ground = ground.map(|terms| Atom { predicate: atom.predicate, terms });
            if ground.is_some_and(|ground| !db.contains(&ground)) {
                solve(&rest, subst, db, out);
            }
        }
        Literal::Comparison(comparison) => {
            if let Some(extended) = compare(comparison, subst) {
                solve(&rest, extended, db, out);
            }
        }
        Literal::Aggregate(_) => panic!("aggregates must be rewritten first"),
    }
}

fn is_ready(literal: &Literal, subst: &Substitution) -> bool {
    let bound = |term: &Term| term.variables().iter().all(|var| subst.contains_key(var));
    match literal {
        Literal::Positive(_) => true,
        Literal::Negative(atom) => atom.terms.iter().all(bound),
        Literal::Comparison(ComparisonLiteral { left, op, right }) => {
            (bound(left) && bound(right))
                || (*op == ComparisonOp::Equal
                    && ((is_free_variable(left, subst) && bound(right))
                        || (is_free_variable(right, subst) && bound(left))))
        }
        Literal::Aggregate(_) => false,
    }
}

fn is_free_variable(term: &Term, subst: &Substitution) -> bool {
    matches!(term, Term::Variable(var) if !subst.contains_key(var))
}

/// Check a comparison, binding a free side of `=` to the value of the other
fn compare(comparison: &ComparisonLiteral, mut subst: Substitution) -> Option<Substitution> {
    let ComparisonLiteral { left, op, right } = comparison;
    if *op == ComparisonOp::Equal {
        for (free, other) in [(left, right), (right, left)] {
            if let Term::Variable(var) = free {
                if !subst.contains_key(var) {
                    let value = instantiate(other, &subst)?;
                    subst.insert(*var, value);
                    return Some(subst);
                }
            }
        }
    }

    let ordering = order(&instantiate(left, &subst)?, &instantiate(right, &subst)?);
    let holds = match op {
        ComparisonOp::Equal => ordering == Ordering::Equal,
        ComparisonOp::NotEqual => ordering != Ordering::Equal,
        ComparisonOp::LessThan => ordering == Ordering::Less,
        ComparisonOp::LessOrEqual => ordering != Ordering::Greater,
        ComparisonOp::GreaterThan => ordering == Ordering::Greater,
        ComparisonOp::GreaterOrEqual => ordering != Ordering::Less,
    };
    holds.then_some(subst)
}

fn unify(pattern: &Term, value: &Term, subst: &mut Substitution) -> bool {
    match pattern {
        Term::Variable(var) => match subst.get(var) {
            Some(bound) => bound == value,
            None => {
                subst.insert(*var, value.clone());
                true
            }
        },
        Term::Constant(_) => pattern == value,
        Term::Compound(..) if pattern.is_arithmetic() => {
            instantiate(pattern, subst).is_some_and(|ground| &ground == value)
        }
        Term::Compound(functor, args) => match value {
            Term::Compound(other, values) if functor == other && args.len() == values.len() => {
                args.iter()
                    .zip(values)
                    .all(|(arg, value)| unify(arg, value, subst))
            }
            _ => false,
        },
    }
}

/// Ground `term` under `subst`, evaluating integer arithmetic
fn instantiate(term: &Term, subst: &Substitution) -> Option<Term> {
    match term {
        Term::Variable(var) => subst.get(var).cloned(),
        Term::Constant(_) => Some(term.clone()),
        Term::Compound(functor, args) if term.is_arithmetic() => {
            let left = integer(&instantiate(&args[0], subst)?)?;
            let right = integer(&instantiate(&args[1], subst)?)?;
            let value = match functor.as_str() {
                "+" => left.checked_add(right)?,
                "-" => left.checked_sub(right)?,
                "*" => left.checked_mul(right)?,
                "/" => left.checked_div(right)?,
                name if name == MODULO_FUNCTOR => left.checked_rem(right)?,
                _ => return None,
            };
            Some(Term::integer(value))
        }
        Term::Compound(functor, args) => {
            let args: Option<Vec<Term>> = args.iter().map(|arg| instantiate(arg, subst)).collect();
            Some(Term::Compound(*functor, args?))
        }
    }
}

fn integer(term: &Term) -> Option<i64> {
    match term {
        Term::Constant(Value::Integer(value)) => Some(*value),
        _ => None,
    }
}

/// Total order on ground terms: integers, then symbolic constants, then
/// strings, then compound terms by arity, name and arguments
fn order(left: &Term, right: &Term) -> Ordering {
    fn rank(term: &Term) -> u8 {
        match term {
            Term::Constant(Value::Integer(_)) => 0,
            Term::Constant(Value::Float(_)) => 1,
            Term::Constant(Value::Boolean(_)) | Term::Constant(Value::Atom(_)) => 2,
            Term::Constant(Value::String(_)) => 3,
            Term::Variable(_) => 4,
            Term::Compound(..) => 5,
        }
    }

    match (left, right) {
        (Term::Constant(Value::Integer(a)), Term::Constant(Value::Integer(b))) => a.cmp(b),
        (Term::Compound(f, xs), Term::Compound(g, ys)) => xs
            .len()
            .cmp(&ys.len())
            .then_with(|| f.as_str().cmp(g.as_str()))
            .then_with(|| {
                xs.iter()
                    .zip(ys)
                    .map(|(x, y)| order(x, y))
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            }),
        _ => rank(left)
            .cmp(&rank(right))
            .then_with(|| left.to_string().cmp(&right.to_string())),
    }
}
