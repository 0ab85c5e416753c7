//! Parser implementation details.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::stream::Stream;
use internment::Intern;
use std::fmt;
use std::hash::Hash;

use crate::anonymous::{name_anonymous_in_body, name_anonymous_variables};
use crate::token::{lexer, Keyword, LexError, SpannedToken, Token};
use crate::{Span, SrcId};
use aggrewrite_ast::*;

type ParserError = Simple<Token, Span>;

#[derive(Debug, Clone)]
pub enum ParseError {
    Lex(LexError),
    Parse(ParserError),
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(error) => error.span(),
            ParseError::Parse(error) => error.span(),
        }
    }

    /// Human readable description, used as the headline of a report
    pub fn message(&self) -> String {
        match self {
            ParseError::Lex(error) => describe(error),
            ParseError::Parse(error) => describe(error),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParseError {}

fn describe<T: fmt::Display + Hash + Eq>(error: &Simple<T, Span>) -> String {
    match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unclosed { delimiter, .. } => {
            format!("Unclosed delimiter '{}'", delimiter)
        }
        SimpleReason::Unexpected => {
            let found = match error.found() {
                Some(token) => format!("'{}'", token),
                None => "end of input".to_string(),
            };
            let mut expected: Vec<String> = error
                .expected()
                .map(|token| match token {
                    Some(token) => format!("'{}'", token),
                    None => "end of input".to_string(),
                })
                .collect();
            expected.sort();
            expected.dedup();

            let mut message = format!("Unexpected {}", found);
            if let Some(label) = error.label() {
                message.push_str(&format!(" while parsing {}", label));
            }
            if !expected.is_empty() {
                message.push_str(&format!(", expected {}", expected.join(", ")));
            }
            message
        }
    }
}

fn ident_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::Ident(ident) => ident }.labelled("identifier")
}

fn ident_value(expected: &'static str) -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::Ident(ident) if ident == expected => ident }
}

/// Predicate names; a leading underscore is reserved for internal predicates
fn predicate_name() -> impl Parser<Token, String, Error = ParserError> + Clone {
    ident_token()
        .validate(|name: String, span, emit| {
            if name.starts_with(INTERNAL_PREFIX) {
                emit(ParserError::custom(
                    span,
                    format!("predicate name '{}' is reserved for internal use", name),
                ));
            }
            name
        })
        .labelled("predicate")
}

fn variable_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! {
        Token::Variable(ident) => ident,
        Token::Ident(ident) if ident.starts_with('_') => ident,
    }
    .labelled("variable")
}

fn string_token() -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::String(value) => value }.labelled("string")
}

fn number_token() -> impl Parser<Token, Value, Error = ParserError> + Clone {
    select! { Token::Number(number) => number }
        .try_map(|value: String, span| {
            if value.contains('.') {
                value
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| ParserError::custom(span, "invalid float"))
            } else {
                value
                    .parse::<i64>()
                    .map(Value::Integer)
                    .map_err(|_| ParserError::custom(span, "invalid integer"))
            }
        })
        .labelled("number")
}

fn signed_number_token() -> impl Parser<Token, Value, Error = ParserError> + Clone {
    operator_token("-")
        .ignore_then(number_token())
        .map(|value| match value {
            Value::Integer(n) => Value::Integer(-n),
            Value::Float(n) => Value::Float(-n),
            other => other,
        })
        .or(number_token())
        .labelled("number")
}

fn keyword_token(keyword: Keyword) -> impl Parser<Token, Keyword, Error = ParserError> + Clone {
    just(Token::Keyword(keyword)).to(keyword)
}

fn operator_token(op: &'static str) -> impl Parser<Token, String, Error = ParserError> + Clone {
    select! { Token::Operator(value) if value == op => value }
}

fn token(kind: Token) -> impl Parser<Token, Token, Error = ParserError> + Clone {
    just(kind)
}

fn lex_with_src(input: &str, src: SrcId) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    let stream = Stream::from_iter(
        Span::after(src, input),
        input
            .chars()
            .enumerate()
            .map(|(idx, ch)| (ch, Span::new(src, idx..idx + 1))),
    );
    lexer()
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Lex).collect())
}

#[cfg(test)]
fn lex(input: &str) -> Result<Vec<SpannedToken>, Vec<ParseError>> {
    lex_with_src(input, SrcId::empty())
}

fn parse_with<T>(
    parser: impl Parser<Token, T, Error = ParserError>,
    input: &str,
    src: SrcId,
) -> Result<T, Vec<ParseError>> {
    let tokens = lex_with_src(input, src)?;
    let stream = Stream::from_iter(Span::after(src, input), tokens.into_iter());
    parser
        .parse(stream)
        .map_err(|errors| errors.into_iter().map(ParseError::Parse).collect())
}

fn factor_parser<'a>(
    term: Recursive<'a, Token, Term, ParserError>,
) -> impl Parser<Token, Term, Error = ParserError> + Clone + 'a {
    let variable = variable_token().map(|s| Term::Variable(Intern::new(s)));

    let number_const = signed_number_token().map(Term::Constant);

    let string_const = string_token().map(|s| Term::Constant(Value::String(Intern::new(s))));

    let parens = term
        .clone()
        .delimited_by(token(Token::LParen), token(Token::RParen));

    let compound_or_constant = ident_token()
        .then(
            term.clone()
                .separated_by(token(Token::Comma))
                .delimited_by(token(Token::LParen), token(Token::RParen))
                .or_not(),
        )
        .map(|(name, args)| match args {
            Some(args) => Term::Compound(Intern::new(name), args),
            None => match name.as_str() {
                "true" => Term::Constant(Value::Boolean(true)),
                "false" => Term::Constant(Value::Boolean(false)),
                _ => Term::Constant(Value::Atom(Intern::new(name))),
            },
        });

    choice((variable, number_const, string_const, parens, compound_or_constant))
}

fn arithmetic_parser<'a>(
    factor: impl Parser<Token, Term, Error = ParserError> + Clone + 'a,
) -> impl Parser<Token, Term, Error = ParserError> + Clone + 'a {
    let mul_div = factor
        .clone()
        .then(
            choice((
                operator_token("*").to("*"),
                operator_token("/").to("/"),
                operator_token("\\").to(MODULO_FUNCTOR),
                ident_value("mod").to(MODULO_FUNCTOR),
            ))
            .then(factor.clone())
            .repeated(),
        )
        .foldl(|left, (op, right)| Term::arithmetic(op, left, right));

    mul_div
        .clone()
        .then(
            choice((operator_token("+").to("+"), operator_token("-").to("-")))
                .then(mul_div)
                .repeated(),
        )
        .foldl(|left, (op, right)| Term::arithmetic(op, left, right))
}

/// Parse a term (variable, constant, or compound) with arithmetic operator precedence
fn term() -> impl Parser<Token, Term, Error = ParserError> + Clone {
    recursive(|term| arithmetic_parser(factor_parser(term))).labelled("term")
}

/// Parse an atom
fn atom() -> impl Parser<Token, Atom, Error = ParserError> + Clone {
    predicate_name()
        .then(
            term()
                .separated_by(token(Token::Comma))
                .delimited_by(token(Token::LParen), token(Token::RParen))
                .or_not(),
        )
        .map(|(predicate, terms)| Atom {
            predicate: Intern::new(predicate),
            terms: terms.unwrap_or_default(),
        })
        .labelled("atom")
}

/// Parse a comparison operator and return the ComparisonOp enum
fn comparison_operator() -> impl Parser<Token, ComparisonOp, Error = ParserError> + Clone {
    choice((
        operator_token("<=").to(ComparisonOp::LessOrEqual),
        operator_token(">=").to(ComparisonOp::GreaterOrEqual),
        operator_token("!=").to(ComparisonOp::NotEqual),
        operator_token("<>").to(ComparisonOp::NotEqual),
        operator_token("==").to(ComparisonOp::Equal),
        operator_token("=").to(ComparisonOp::Equal),
        operator_token("<").to(ComparisonOp::LessThan),
        operator_token(">").to(ComparisonOp::GreaterThan),
    ))
    .labelled("comparison operator")
}

/// Parse an infix comparison (e.g., X > 3, K1 = K + 1)
fn comparison() -> impl Parser<Token, ComparisonLiteral, Error = ParserError> + Clone {
    term()
        .then(comparison_operator())
        .then(term())
        .map(|((left, op), right)| ComparisonLiteral { left, op, right })
        .labelled("comparison")
}

/// Literals allowed inside aggregate elements and rule bodies (no aggregates)
fn basic_literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    let negated = keyword_token(Keyword::Not)
        .ignore_then(atom())
        .map(Literal::Negative);

    let comparison = comparison().map(Literal::Comparison);

    let positive = atom().map(Literal::Positive);

    choice((negated, comparison, positive))
}

fn aggregate_function() -> impl Parser<Token, AggregateFunction, Error = ParserError> + Clone {
    token(Token::Hash)
        .ignore_then(choice((
            ident_value("count").to(AggregateFunction::Count),
            ident_value("sum").to(AggregateFunction::Sum),
            ident_value("min").to(AggregateFunction::Min),
            ident_value("max").to(AggregateFunction::Max),
        )))
        .labelled("aggregate function")
}

/// Parse one aggregate element: `X, Y : p(X, Y), not q(X)`
fn aggregate_element() -> impl Parser<Token, AggregateElement, Error = ParserError> + Clone {
    term()
        .separated_by(token(Token::Comma))
        .at_least(1)
        .then(
            token(Token::Colon)
                .ignore_then(basic_literal().separated_by(token(Token::Comma)).at_least(1))
                .or_not(),
        )
        .map(|(element_terms, element_literals)| AggregateElement {
            element_terms,
            element_literals: element_literals.unwrap_or_default(),
        })
        .labelled("aggregate element")
}

/// Parse `#function { element; ... }`
fn aggregate_body(
) -> impl Parser<Token, (AggregateFunction, Vec<AggregateElement>), Error = ParserError> + Clone {
    aggregate_function().then(
        aggregate_element()
            .separated_by(token(Token::Semicolon))
            .delimited_by(token(Token::LBrace), token(Token::RBrace)),
    )
}

/// Parse an aggregate literal with a leading or trailing bound.
///
/// `B op #f{...}` is kept as is; `#f{...} op B` becomes `B flip(op) #f{...}`.
fn aggregate_literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    let leading_bound = term()
        .then(comparison_operator())
        .then(aggregate_body())
        .map(|((bound, op), (function, elements))| AggregateAtom {
            function,
            lower_bound_operator: op,
            lower_bound_term: bound,
            elements,
        });

    let trailing_bound = aggregate_body()
        .then(comparison_operator())
        .then(term())
        .map(|(((function, elements), op), bound)| AggregateAtom {
            function,
            lower_bound_operator: op.flip(),
            lower_bound_term: bound,
            elements,
        });

    keyword_token(Keyword::Not)
        .or_not()
        .then(choice((trailing_bound, leading_bound)))
        .map(|(negation, atom)| {
            Literal::Aggregate(AggregateLiteral {
                atom,
                negated: negation.is_some(),
            })
        })
        .labelled("aggregate")
}

/// Parse a literal (positive, negative, comparison, or aggregate)
fn literal() -> impl Parser<Token, Literal, Error = ParserError> + Clone {
    choice((aggregate_literal(), basic_literal())).labelled("literal")
}

fn body() -> impl Parser<Token, Vec<Literal>, Error = ParserError> + Clone {
    literal().separated_by(token(Token::Comma)).at_least(1)
}

/// Parse a fact
fn fact() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    atom()
        .then_ignore(token(Token::Dot))
        .map(|atom| Statement::Fact(Fact { atom }))
        .labelled("fact")
}

/// Parse a rule
fn rule() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    atom()
        .then_ignore(token(Token::RuleSep))
        .then(body())
        .then_ignore(token(Token::Dot))
        .map(|(head, body)| Statement::Rule(Rule { head, body }))
        .labelled("rule")
}

/// Parse a constraint
fn constraint() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    token(Token::RuleSep)
        .ignore_then(body())
        .then_ignore(token(Token::Dot))
        .map(|body| Statement::Constraint(Constraint { body }))
        .labelled("constraint")
}

/// Parse a statement; every `_` in it becomes a variable of its own
fn statement() -> impl Parser<Token, Statement, Error = ParserError> + Clone {
    choice((constraint(), rule(), fact()))
        .map(name_anonymous_variables)
        .labelled("statement")
}

/// Parse a program
fn program() -> impl Parser<Token, Program, Error = ParserError> + Clone {
    statement()
        .repeated()
        .map(|statements| Program { statements })
        .then_ignore(end())
        .labelled("program")
}

/// Parse a whole program
pub fn parse_program(input: &str, src: SrcId) -> Result<Program, Vec<ParseError>> {
    parse_with(program(), input, src)
}

/// Parse a comma separated list of body literals, e.g. `p(X), 2 <= #count { Y : q(X, Y) }`
pub fn parse_body(input: &str, src: SrcId) -> Result<Vec<Literal>, Vec<ParseError>> {
    parse_with(
        body().then_ignore(end()).map(name_anonymous_in_body),
        input,
        src,
    )
}

#[cfg(test)]
#[path = "../tests/unit/parser_tests.rs"]
mod tests;
