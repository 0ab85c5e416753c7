//! The aggregate encoder.
//!
//! One encoder handles one aggregate function under a fixed set of comparison
//! operators. Encoding an occurrence:
//!
//! 1. rejects the occurrence if its function or operator does not fit
//! 2. asks the function's strategy for the result rules
//! 3. builds one element rule per element
//! 4. internalizes the predicates the occurrence defines under its id
//! 5. merges everything into one fragment
//!
//! Encoders hold no per-occurrence state and can be shared between threads.

use std::collections::{BTreeSet, HashSet};

use aggrewrite_ast::{AggregateElement, AggregateFunction, ComparisonOp, ProgramFragment, Rule};
use tracing::{debug, trace};

use crate::context::AggregateInfo;
use crate::element;
use crate::error::EncodingError;
use crate::internalize::make_prefixed_predicates_internal;
use crate::strategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateEncoder {
    aggregate_function_to_encode: AggregateFunction,
    accepted_operators: BTreeSet<ComparisonOp>,
}

impl AggregateEncoder {
    pub fn new(
        aggregate_function_to_encode: AggregateFunction,
        accepted_operators: impl IntoIterator<Item = ComparisonOp>,
    ) -> Self {
        AggregateEncoder {
            aggregate_function_to_encode,
            accepted_operators: accepted_operators.into_iter().collect(),
        }
    }

    /// Encoder for `function` accepting every comparison operator
    pub fn for_function(function: AggregateFunction) -> Self {
        Self::new(function, ComparisonOp::ALL)
    }

    pub fn count() -> Self {
        Self::for_function(AggregateFunction::Count)
    }

    pub fn sum() -> Self {
        Self::for_function(AggregateFunction::Sum)
    }

    pub fn min() -> Self {
        Self::for_function(AggregateFunction::Min)
    }

    pub fn max() -> Self {
        Self::for_function(AggregateFunction::Max)
    }

    pub fn aggregate_function_to_encode(&self) -> AggregateFunction {
        self.aggregate_function_to_encode
    }

    pub fn accepted_operators(&self) -> &BTreeSet<ComparisonOp> {
        &self.accepted_operators
    }

    /// Encode a batch of occurrences into one fragment.
    ///
    /// Ids must be unique within the batch. The first failing occurrence aborts
    /// the batch and nothing is returned for the others.
    pub fn encode_aggregate_literals(
        &self,
        aggregates: &[AggregateInfo],
    ) -> Result<ProgramFragment, EncodingError> {
        debug_assert!(
            {
                let mut seen = HashSet::new();
                aggregates.iter().all(|info| seen.insert(info.id()))
            },
            "duplicate aggregate ids in one batch"
        );

        let mut fragment = ProgramFragment::new();
        for info in aggregates {
            fragment.accumulate(self.encode_aggregate_literal(info)?);
        }
        Ok(fragment)
    }

    /// Encode one occurrence. A rejected occurrence produces no rules at all.
    pub fn encode_aggregate_literal(
        &self,
        info: &AggregateInfo,
    ) -> Result<ProgramFragment, EncodingError> {
        self.check_applicable(info)?;

        let result = self.encode_aggregate_result(info)?;
        let elements: Vec<Rule> = info
            .elements()
            .iter()
            .map(|element| self.encode_aggregate_element(info, element))
            .collect();

        let element_count = elements.len();
        let fragment = make_prefixed_predicates_internal(
            result.merge(ProgramFragment::from_rules(elements)),
            info.id(),
        );

        debug!(
            id = info.id(),
            function = %info.function(),
            operator = %info.operator(),
            elements = element_count,
            rules = fragment.rules.len(),
            "encoded aggregate"
        );
        Ok(fragment)
    }

    /// Result rules from the function's strategy, not yet internalized
    pub fn encode_aggregate_result(
        &self,
        info: &AggregateInfo,
    ) -> Result<ProgramFragment, EncodingError> {
        strategy::encode_result(self.aggregate_function_to_encode, info)
    }

    /// The element rule of one element, not yet internalized
    pub fn encode_aggregate_element(&self, info: &AggregateInfo, element: &AggregateElement) -> Rule {
        let rule = element::encode_aggregate_element(info, element);
        trace!(id = info.id(), rule = %rule, "element rule");
        rule
    }

    fn check_applicable(&self, info: &AggregateInfo) -> Result<(), EncodingError> {
        if info.function() != self.aggregate_function_to_encode {
            return Err(EncodingError::UnsupportedFunction {
                id: info.id().to_string(),
                expected: self.aggregate_function_to_encode,
                found: info.function(),
            });
        }
        if !self.accepted_operators.contains(&info.operator()) {
            return Err(EncodingError::UnsupportedOperator {
                id: info.id().to_string(),
                function: self.aggregate_function_to_encode,
                operator: info.operator(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/encoder_tests.rs"]
mod tests;
