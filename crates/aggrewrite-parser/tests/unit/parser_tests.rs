    use super::*;

    fn parse_program(input: &str) -> Result<Program, Vec<ParseError>> {
        super::parse_program(input, SrcId::empty())
    }

    fn parse_body(input: &str) -> Result<Vec<Literal>, Vec<ParseError>> {
        super::parse_body(input, SrcId::empty())
    }

    fn single_aggregate(input: &str) -> AggregateLiteral {
        let body = parse_body(input).expect("body should parse");
        assert_eq!(body.len(), 1, "expected one literal in {:?}", body);
        match body.into_iter().next() {
            Some(Literal::Aggregate(aggregate)) => aggregate,
            other => panic!("Expected aggregate literal, got {:?}", other),
        }
    }

    fn var(name: &str) -> Term {
        Term::variable(name)
    }

    #[test]
    fn test_lex_rule_tokens() {
        let tokens = lex("p(X) :- not q(X).").expect("lexing should succeed");
        let kinds: Vec<Token> = tokens.into_iter().map(|(token, _)| token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Ident("p".to_string()),
                Token::LParen,
                Token::Variable("X".to_string()),
                Token::RParen,
                Token::RuleSep,
                Token::Keyword(Keyword::Not),
                Token::Ident("q".to_string()),
                Token::LParen,
                Token::Variable("X".to_string()),
                Token::RParen,
                Token::Dot,
            ]
        );
    }

    #[test]
    fn test_lex_skips_comments() {
        let tokens = lex("% line\n/* block */ p.").expect("lexing should succeed");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_string_literal_rejects_raw_newline() {
        assert!(lex("\"line\nnext\"").is_err());
    }

    #[test]
    fn test_parse_facts_rules_and_constraints() {
        let program = parse_program(
            r#"
            edge(a, b).
            reach(X, Y) :- edge(X, Y).
            :- reach(X, X).
            "#,
        )
        .expect("program should parse");

        assert_eq!(program.statements.len(), 3);
        assert!(matches!(program.statements[0], Statement::Fact(_)));
        assert!(matches!(program.statements[1], Statement::Rule(_)));
        assert!(matches!(program.statements[2], Statement::Constraint(_)));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        let body = parse_body("K1 = K + 2 * N").expect("comparison should parse");
        match &body[0] {
            Literal::Comparison(comparison) => {
                assert_eq!(comparison.op, ComparisonOp::Equal);
                assert_eq!(
                    comparison.right,
                    Term::arithmetic(
                        "+",
                        var("K"),
                        Term::arithmetic("*", Term::integer(2), var("N"))
                    )
                );
            }
            other => panic!("Expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_count_with_leading_bound() {
        let aggregate = single_aggregate("2 <= #count { X : p(X) }");
        assert!(!aggregate.negated);
        assert_eq!(aggregate.atom.function, AggregateFunction::Count);
        assert_eq!(aggregate.atom.lower_bound_operator, ComparisonOp::LessOrEqual);
        assert_eq!(aggregate.atom.lower_bound_term, Term::integer(2));
        assert_eq!(aggregate.atom.elements.len(), 1);
        assert_eq!(aggregate.atom.elements[0].element_terms, vec![var("X")]);
    }

    #[test]
    fn test_parse_trailing_bound_is_flipped() {
        let aggregate = single_aggregate("#sum { W, X : cost(X, W) } > 10");
        assert_eq!(aggregate.atom.function, AggregateFunction::Sum);
        // sum > 10  is  10 < sum
        assert_eq!(aggregate.atom.lower_bound_operator, ComparisonOp::LessThan);
        assert_eq!(aggregate.atom.lower_bound_term, Term::integer(10));
        assert_eq!(aggregate.atom.elements[0].element_terms, vec![var("W"), var("X")]);
    }

    #[test]
    fn test_parse_assignment_aggregate() {
        let aggregate = single_aggregate("N = #max { V : val(V) }");
        assert_eq!(aggregate.atom.function, AggregateFunction::Max);
        assert_eq!(aggregate.atom.lower_bound_operator, ComparisonOp::Equal);
        assert_eq!(aggregate.atom.lower_bound_term, var("N"));
    }

    #[test]
    fn test_parse_negated_aggregate() {
        let aggregate = single_aggregate("not 3 < #min { V : val(V) }");
        assert!(aggregate.negated);
        assert_eq!(aggregate.atom.function, AggregateFunction::Min);
    }

    #[test]
    fn test_parse_multiple_elements_and_empty_condition() {
        let aggregate =
            single_aggregate("K <= #count { X : p(X), not q(X); Y, b : r(Y), Y > 2; c }");
        let elements = &aggregate.atom.elements;
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].element_literals.len(), 2);
        assert!(elements[0].element_literals[1].is_negative());
        assert_eq!(elements[1].element_terms.len(), 2);
        assert!(matches!(
            elements[1].element_literals[1],
            Literal::Comparison(_)
        ));
        assert!(elements[2].element_literals.is_empty());
    }

    #[test]
    fn test_parse_empty_aggregate() {
        let aggregate = single_aggregate("0 = #count { }");
        assert!(aggregate.atom.elements.is_empty());
    }

    #[test]
    fn test_parse_rule_with_aggregate_and_dependencies() {
        let program =
            parse_program("big(G) :- group(G), 3 <= #count { X : member(G, X) }, G != none.")
                .expect("rule should parse");
        match &program.statements[0] {
            Statement::Rule(rule) => {
                assert_eq!(rule.body.len(), 3);
                assert!(rule.body[0].is_positive());
                assert!(rule.body[1].is_aggregate());
                assert!(matches!(rule.body[2], Literal::Comparison(_)));
            }
            other => panic!("Expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_constraint_with_aggregate() {
        let program = parse_program(":- #count { X : selected(X) } > 2.").expect("should parse");
        match &program.statements[0] {
            Statement::Constraint(constraint) => assert!(constraint.body[0].is_aggregate()),
            other => panic!("Expected constraint, got {:?}", other),
        }
    }

    #[test]
    fn test_reserved_predicate_name_is_rejected() {
        let result = parse_program("_count_1_result(a, 1).");
        let errors = result.expect_err("internal predicate names must be rejected");
        assert!(errors
            .iter()
            .any(|error| error.message().contains("reserved for internal use")));
    }

    #[test]
    fn test_unknown_aggregate_function_is_an_error() {
        let result = parse_program("p :- 2 <= #avg { X : q(X) }.");
        assert!(result.is_err());
    }

    #[test]
    fn test_error_reports_span() {
        let errors = parse_program("p(X) :- q(X)").expect_err("missing dot");
        let span = errors[0].span();
        assert_eq!(span.src(), SrcId::empty());
        assert!(span.start() <= "p(X) :- q(X)".len());
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        let text = "h(G, N) :- g(G), N = #sum { W, X : c(G, X, W); 1, z : not d(G) }.";
        let program = parse_program(text).expect("should parse");
        let rendered = program.to_string();
        let reparsed = parse_program(&rendered).expect("rendered program should parse");
        assert_eq!(program, reparsed);
    }

    #[test]
    fn test_modulo_accepts_backslash_and_keyword() {
        let backslash = parse_program("h(Y) :- p(X), Y = X \\ 3.").expect("should parse");
        let keyword = parse_program("h(Y) :- p(X), Y = X mod 3.").expect("should parse");
        assert_eq!(backslash, keyword);

        let rendered = backslash.to_string();
        assert_eq!(rendered, "h(Y) :- p(X), Y = X \\ 3.\n");
        assert_eq!(parse_program(&rendered).expect("rendered program should parse"), backslash);
    }
