// ADDVALUE - add a number to every numeric cell, locally

use rangefn_core::{normalize, CellValue, FunctionError, FunctionOutput, FunctionResult};
use serde_json::Value;

const DEFAULT_INCREMENT: f64 = 1.0;

/// Add `value` (default 1) to each numeric cell of `range`.
///
/// Numeric text is parsed and becomes a number. Blank cells come back as
/// `""`. Anything else passes through untouched. The output has the
/// shape of the normalized input. A sum that overflows `f64` fails the
/// whole call rather than leaving a hole in the output.
pub fn add_value(range: Option<&Value>, value: Option<&Value>) -> FunctionResult {
    let range = normalize(range)?;
    let increment = increment(value)?;

    let result = range.try_map_cells(|cell| {
        if cell.is_blank() {
            return Ok(CellValue::Text(String::new()));
        }
        match cell.numeric() {
            Some(n) => {
                let sum = n + increment;
                if !sum.is_finite() {
                    return Err(FunctionError::InvalidArgument("result out of range".into()));
                }
                Ok(CellValue::Number(sum))
            }
            None => Ok(cell.clone()),
        }
    })?;
    Ok(FunctionOutput::Range(result))
}

fn increment(value: Option<&Value>) -> Result<f64, FunctionError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_INCREMENT),
        Some(v) => CellValue::from_json(v)
            .and_then(|c| c.numeric())
            .ok_or_else(|| FunctionError::InvalidArgument(format!("value must be a number, got {}", v))),
    }
}
