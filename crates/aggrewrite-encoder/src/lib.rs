//! Rewriting of ASP aggregate literals into plain rules.
//!
//! An aggregate occurrence such as
//!
//! ```text
//! big(G) :- group(G), 3 <= #count { X : member(G, X) }.
//! ```
//!
//! is encoded as a family of rules whose predicates are scoped by the
//! occurrence id (`count_1`) and moved into the internal namespace, so any
//! number of occurrences can live in one program without clashing.
//!
//! - [`context`]: discovers occurrences, assigns ids, computes outer context
//! - [`encoder`]: the per-function encoder and its batch form
//! - [`rewriting`]: whole-program rewriting with a registry of encoders

pub mod context;
pub mod element;
pub mod encoder;
pub mod error;
pub mod internalize;
pub mod rewriting;
pub mod strategy;

pub use context::{AggregateInfo, AggregateRewritingContext};
pub use encoder::AggregateEncoder;
pub use error::{EncodingError, RewriteError};
pub use rewriting::{AggregateRewriter, EncoderRegistry};
