//! Host boundary conversion.
//!
//! Inside the crate functions return `Result<FunctionOutput, FunctionError>`.
//! The host has no error channel, only a cell to render into, so
//! [`into_cell_value`] turns errors into a 1×1 range holding an
//! `"Error: ..."` string.

use serde_json::Value;

use crate::error::FunctionError;
use crate::range::Range;

/// Prefix of every in-band error string.
pub const ERROR_PREFIX: &str = "Error: ";

/// What a function hands back on success.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionOutput {
    /// A locally computed range
    Range(Range),
    /// A single string (rendered into one cell)
    Text(String),
    /// The remote service's `result`, passed on untouched
    Remote(Value),
}

impl FunctionOutput {
    pub fn into_json(self) -> Value {
        match self {
            FunctionOutput::Range(range) => range.to_json(),
            FunctionOutput::Text(s) => Value::String(s),
            FunctionOutput::Remote(v) => v,
        }
    }
}

pub type FunctionResult = Result<FunctionOutput, FunctionError>;

/// The in-band form of an error: `[["Error: <message>"]]`.
pub fn error_cell(err: &FunctionError) -> Value {
    Value::Array(vec![Value::Array(vec![Value::String(format!(
        "{}{}",
        ERROR_PREFIX, err
    ))])])
}

/// Convert a function result into what the host renders.
pub fn into_cell_value(result: FunctionResult) -> Value {
    match result {
        Ok(output) => output.into_json(),
        Err(err) => error_cell(&err),
    }
}
