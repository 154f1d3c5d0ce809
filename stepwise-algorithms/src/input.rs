//! Input extraction shared by the algorithm families.

use crate::registry::AlgorithmInfo;
use stepwise_core::error::{Result, StepwiseError};
use stepwise_core::params::{RunInput, SortOrder, check_array_len};

/// Pull an array and sort order out of an input.
pub(crate) fn array_input(info: &AlgorithmInfo, input: &RunInput) -> Result<(Vec<i64>, SortOrder)> {
    match input {
        RunInput::Array { values, order } => {
            check_array_len("values", values.len())?;
            Ok((values.clone(), *order))
        }
        other => Err(info.mismatch(other)),
    }
}

/// Pull an array and target out of an input.
pub(crate) fn search_input(info: &AlgorithmInfo, input: &RunInput) -> Result<(Vec<i64>, i64)> {
    match input {
        RunInput::Search { values, target } => {
            check_array_len("values", values.len())?;
            Ok((values.clone(), *target))
        }
        other => Err(info.mismatch(other)),
    }
}

/// Reject a value above `max`.
pub(crate) fn check_at_most(parameter: &str, value: usize, max: usize) -> Result<()> {
    if value > max {
        return Err(StepwiseError::invalid(
            parameter,
            format!("{} exceeds the limit of {}", value, max),
        ));
    }
    Ok(())
}
