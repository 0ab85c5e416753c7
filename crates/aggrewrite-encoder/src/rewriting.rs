//! Whole-program rewriting.
//!
//! Replaces every aggregate literal with its internal result atom and appends
//! the encodings of all occurrences.
//!
//! ```text
//! big(G) :- group(G), 3 <= #count { X : member(G, X) }.
//! ```
//!
//! becomes
//!
//! ```text
//! big(G) :- group(G), _count_1_result(args(G), 3).
//! _count_1_element_tuple(args(G), tuple(X)) :- member(G, X), group(G).
//! ...
//! ```

use std::collections::BTreeMap;

use aggrewrite_ast::{
    AggregateFunction, Constraint, Literal, Program, ProgramFragment, Rule, Statement,
};
use tracing::{debug, info};

use crate::context::{AggregateInfo, AggregateRewritingContext};
use crate::encoder::AggregateEncoder;
use crate::error::RewriteError;

/// The encoder used for each aggregate function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderRegistry {
    encoders: BTreeMap<AggregateFunction, AggregateEncoder>,
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        AggregateFunction::ALL
            .into_iter()
            .fold(Self::empty(), |registry, function| {
                registry.with_encoder(AggregateEncoder::for_function(function))
            })
    }
}

impl EncoderRegistry {
    pub fn empty() -> Self {
        EncoderRegistry {
            encoders: BTreeMap::new(),
        }
    }

    /// Register `encoder` for its function, replacing any previous one
    pub fn with_encoder(mut self, encoder: AggregateEncoder) -> Self {
        self.encoders
            .insert(encoder.aggregate_function_to_encode(), encoder);
        self
    }

    pub fn get(&self, function: AggregateFunction) -> Option<&AggregateEncoder> {
        self.encoders.get(&function)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AggregateRewriter {
    registry: EncoderRegistry,
}

impl AggregateRewriter {
    pub fn new(registry: EncoderRegistry) -> Self {
        AggregateRewriter { registry }
    }

    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    /// Rewrite `program` into an aggregate-free program
    pub fn rewrite(&self, program: &Program) -> Result<Program, RewriteError> {
        if !program.has_aggregates() {
            debug!("program has no aggregates");
            return Ok(program.clone());
        }

        let context = AggregateRewritingContext::from_program(program);
        let encodings = self.encode_all(context.occurrences())?;

        let mut statements: Vec<Statement> = program
            .statements
            .iter()
            .enumerate()
            .map(|(index, statement)| replace_aggregates(index, statement, &context))
            .collect();

        info!(
            aggregates = context.occurrences().len(),
            rules = encodings.rules.len(),
            "rewrote aggregates"
        );
        statements.extend(encodings.into_statements());
        Ok(Program { statements })
    }

    /// Batch-encode the occurrences of each function with its encoder
    fn encode_all(&self, occurrences: &[AggregateInfo]) -> Result<ProgramFragment, RewriteError> {
        let mut by_function: BTreeMap<AggregateFunction, Vec<AggregateInfo>> = BTreeMap::new();
        for info in occurrences {
            by_function
                .entry(info.function())
                .or_default()
                .push(info.clone());
        }

        let mut fragment = ProgramFragment::new();
        for (function, infos) in by_function {
            let encoder = self
                .registry
                .get(function)
                .ok_or(RewriteError::NoEncoder(function))?;
            fragment.accumulate(encoder.encode_aggregate_literals(&infos)?);
        }
        Ok(fragment)
    }
}

fn replace_aggregates(
    index: usize,
    statement: &Statement,
    context: &AggregateRewritingContext,
) -> Statement {
    let replace_body = |body: &[Literal]| -> Vec<Literal> {
        body.iter()
            .enumerate()
            .map(|(position, literal)| {
                match (literal, context.occurrence_at(index, position)) {
                    (Literal::Aggregate(_), Some(info)) => info.replacement_literal(),
                    _ => literal.clone(),
                }
            })
            .collect()
    };

    match statement {
        Statement::Fact(_) => statement.clone(),
        Statement::Rule(rule) => {
            Statement::Rule(Rule::new(rule.head.clone(), replace_body(&rule.body)))
        }
        Statement::Constraint(constraint) => Statement::Constraint(Constraint {
            body: replace_body(&constraint.body),
        }),
    }
}

#[cfg(test)]
#[path = "../tests/unit/rewriting_tests.rs"]
mod tests;
