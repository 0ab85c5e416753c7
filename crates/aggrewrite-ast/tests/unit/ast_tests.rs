use super::*;

fn var(name: &str) -> Term {
    Term::variable(name)
}

fn make_atom(predicate: &str, terms: Vec<Term>) -> Atom {
    Atom::new(predicate, terms)
}

fn count_literal(negated: bool) -> AggregateLiteral {
    AggregateLiteral {
        atom: AggregateAtom {
            function: AggregateFunction::Count,
            lower_bound_operator: ComparisonOp::LessOrEqual,
            lower_bound_term: var("K"),
            elements: vec![AggregateElement::new(
                vec![var("X")],
                vec![Literal::Positive(make_atom("p", vec![var("X"), var("Y")]))],
            )],
        },
        negated,
    }
}

#[test]
fn test_atom_equality() {
    let atom1 = Atom {
        predicate: Intern::new("parent".to_string()),
        terms: vec![
            Term::Constant(Value::Atom(Intern::new("john".to_string()))),
            Term::Constant(Value::Atom(Intern::new("mary".to_string()))),
        ],
    };

    let atom2 = make_atom("parent", vec![Term::constant("john"), Term::constant("mary")]);

    assert_eq!(atom1, atom2);
}

#[test]
fn test_literal_methods() {
    let atom = make_atom("test", vec![]);

    let pos = Literal::Positive(atom.clone());
    let neg = Literal::Negative(atom.clone());
    let agg = Literal::Aggregate(count_literal(false));

    assert!(pos.is_positive());
    assert!(!pos.is_negative());
    assert!(!neg.is_positive());
    assert!(neg.is_negative());
    assert!(agg.is_aggregate());
    assert_eq!(pos.atom(), Some(&atom));
    assert_eq!(neg.atom(), Some(&atom));
    assert_eq!(agg.atom(), None);
}

#[test]
fn test_program_construction() {
    let mut program = Program::new();
    assert_eq!(program.statements.len(), 0);

    program.add_statement(Statement::Fact(Fact {
        atom: make_atom("test", vec![]),
    }));
    assert_eq!(program.statements.len(), 1);
    assert!(!program.has_aggregates());

    program.add_statement(Statement::Constraint(Constraint {
        body: vec![Literal::Aggregate(count_literal(false))],
    }));
    assert!(program.has_aggregates());
}

#[test]
fn test_aggregate_literal_exposes_only_bound_variables() {
    let literal = Literal::Aggregate(count_literal(false));
    let vars: Vec<String> = literal.variables().iter().map(|v| v.to_string()).collect();
    assert_eq!(vars, vec!["K"]);

    let element_vars: Vec<String> = count_literal(false)
        .atom
        .element_variables()
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(element_vars, vec!["X", "Y"]);
}

#[test]
fn test_comparison_op_flip_and_negate() {
    for op in ComparisonOp::ALL {
        assert_eq!(op.flip().flip(), op);
        assert_eq!(op.negate().negate(), op);
    }
    assert_eq!(ComparisonOp::LessThan.flip(), ComparisonOp::GreaterThan);
    assert_eq!(ComparisonOp::LessThan.negate(), ComparisonOp::GreaterOrEqual);
}

#[test]
fn test_display_rule_with_arithmetic_and_negation() {
    let rule = Rule::new(
        make_atom("rank", vec![var("T2"), var("K1")]),
        vec![
            Literal::Positive(make_atom("rank", vec![var("T1"), var("K")])),
            Literal::Negative(make_atom("blocked", vec![var("T2")])),
            Literal::Comparison(ComparisonLiteral::new(
                var("K1"),
                ComparisonOp::Equal,
                Term::arithmetic("+", var("K"), Term::integer(1)),
            )),
        ],
    );

    assert_eq!(
        rule.to_string(),
        "rank(T2, K1) :- rank(T1, K), not blocked(T2), K1 = K + 1."
    );
}

#[test]
fn test_display_nested_arithmetic_is_parenthesized() {
    let term = Term::arithmetic(
        "*",
        Term::arithmetic("+", var("A"), var("B")),
        Term::integer(2),
    );
    assert_eq!(term.to_string(), "(A + B) * 2");
}

#[test]
fn test_display_aggregate_literal() {
    assert_eq!(
        Literal::Aggregate(count_literal(true)).to_string(),
        "not K <= #count { X : p(X, Y) }"
    );
}

#[test]
fn test_display_string_constant_is_escaped() {
    let term = Term::Constant(Value::String(Intern::new("a\"b\n".to_string())));
    assert_eq!(term.to_string(), "\"a\\\"b\\n\"");
}

#[test]
fn test_map_atoms_reaches_aggregate_elements() {
    let rule = Rule::new(
        make_atom("h", vec![]),
        vec![Literal::Aggregate(count_literal(false))],
    );
    let renamed = rule.map_atoms(&|atom: &Atom| Atom {
        predicate: Intern::new(format!("x_{}", atom.predicate)),
        terms: atom.terms.clone(),
    });

    let names: Vec<String> = renamed
        .predicates()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(names, vec!["x_h/0", "x_p/2"]);
}

#[test]
fn test_fragment_merge_concatenates_rules_and_unions_facts() {
    let fact = make_atom("f", vec![Term::integer(1)]);
    let rule_a = Rule::new(make_atom("a", vec![]), vec![]);
    let rule_b = Rule::new(make_atom("b", vec![]), vec![]);

    let mut left = ProgramFragment::from_rules(vec![rule_a.clone()]);
    left.facts.insert(fact.clone());
    let mut right = ProgramFragment::from_rules(vec![rule_b.clone()]);
    right.facts.insert(fact.clone());

    let merged = left.merge(right);
    assert_eq!(merged.rules, vec![rule_a, rule_b]);
    assert_eq!(merged.facts.len(), 1);
    assert_eq!(merged.head_predicates().len(), 3);
}

#[test]
fn test_fragment_merge_is_associative() {
    let frag = |name: &str| ProgramFragment::from_rules(vec![Rule::new(make_atom(name, vec![]), vec![])]);

    let left = frag("a").merge(frag("b")).merge(frag("c"));
    let right = frag("a").merge(frag("b").merge(frag("c")));
    assert_eq!(left, right);

    let collected: ProgramFragment = vec![frag("a"), frag("b"), frag("c")].into_iter().collect();
    assert_eq!(collected, left);
}

#[test]
fn test_empty_fragment_into_program() {
    let fragment = ProgramFragment::new();
    assert!(fragment.is_empty());
    assert!(fragment.into_program().statements.is_empty());
}

#[test]
fn test_internal_atoms() {
    assert!(make_atom("_count_1_result", vec![]).is_internal());
    assert!(!make_atom("count_1_result", vec![]).is_internal());
}

#[test]
fn test_display_modulo_uses_backslash() {
    let term = Term::arithmetic(MODULO_FUNCTOR, var("X"), Term::integer(2));
    assert!(term.is_arithmetic());
    assert_eq!(term.to_string(), "X \\ 2");

    let nested = Term::arithmetic("+", term, Term::integer(1));
    assert_eq!(nested.to_string(), "(X \\ 2) + 1");
}

#[cfg(feature = "serde")]
#[test]
fn test_program_serde_round_trip() {
    let program = Program {
        statements: vec![
            Statement::Fact(Fact {
                atom: make_atom("cost", vec![Term::constant("a"), Term::integer(-3)]),
            }),
            Statement::Rule(Rule::new(
                make_atom("h", vec![var("K")]),
                vec![
                    Literal::Aggregate(count_literal(false)),
                    Literal::Negative(make_atom("q", vec![var("K")])),
                ],
            )),
        ],
    };

    let json = serde_json::to_string(&program).expect("program serializes");
    let restored: Program = serde_json::from_str(&json).expect("program deserializes");
    assert_eq!(restored, program);

    let fragment = ProgramFragment::new_with(
        vec![Rule::new(make_atom("r", vec![]), vec![])],
        [make_atom("f", vec![Term::integer(1)])].into_iter().collect(),
    );
    let json = serde_json::to_string(&fragment).expect("fragment serializes");
    let restored: ProgramFragment = serde_json::from_str(&json).expect("fragment deserializes");
    assert_eq!(restored, fragment);
}

#[test]
fn test_statement_predicates_include_aggregate_elements() {
    let statement = Statement::Rule(Rule::new(
        make_atom("h", vec![var("K")]),
        vec![
            Literal::Negative(make_atom("q", vec![var("K")])),
            Literal::Aggregate(count_literal(false)),
        ],
    ));
    let names: Vec<String> = statement
        .predicates()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["h/1", "q/1", "p/2"]);

    let constraint = Statement::Constraint(Constraint {
        body: vec![Literal::Positive(make_atom("r", vec![]))],
    });
    assert_eq!(constraint.predicates().len(), 1);
}
