//! Parser for ASP programs containing aggregates
//!
//! This crate implements a parser combinator-based parser using the Chumsky library.
//! It parses program text into the `aggrewrite-ast` model.
//!
//! # Supported Syntax
//!
//! - **Facts**: `edge(a, b).`
//! - **Rules**: `reach(X, Z) :- edge(X, Y), reach(Y, Z).`
//! - **Constraints**: `:- selected(X), not allowed(X).`
//! - **Built-ins**: Arithmetic (`K1 = K + 1`) and comparisons (`X > 5`)
//! - **Aggregates**: `N = #count { X : p(X) }`, `#sum { W, X : cost(X, W) } > 10`,
//!   `not 2 <= #max { V : val(V) }`
//!
//! Predicate names starting with `_` are reserved for predicates generated by the
//! rewriting and are rejected.
//!
//! # Example
//!
//! ```ignore
//! use aggrewrite_parser::{parse_program, SrcId};
//!
//! let program_text = "big(G) :- group(G), 3 <= #count { X : member(G, X) }.";
//! let program = parse_program(program_text, SrcId::empty()).expect("Parse error");
//! ```

mod anonymous;
mod parser;
mod source;
mod token;

pub use parser::{parse_body, parse_program, ParseError};
pub use source::{Span, SrcId};
pub use token::{Keyword, LexError, Token};
