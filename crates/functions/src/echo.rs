// TEST - diagnostic echo

use chrono::{Local, NaiveTime};
use rangefn_core::{CellValue, FunctionOutput, FunctionResult};
use serde_json::Value;

const DEFAULT_MESSAGE: &str = "Hello";

/// `"SUCCESS: <message> at <time>"` with the current local time.
pub fn echo(message: Option<&Value>) -> FunctionResult {
    echo_at(message, Local::now().time())
}

pub fn echo_at(message: Option<&Value>, time: NaiveTime) -> FunctionResult {
    let message = match message {
        None | Some(Value::Null) => DEFAULT_MESSAGE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => CellValue::from_json(other)
            .map(|c| c.display())
            .unwrap_or_else(|| other.to_string()),
    };
    Ok(FunctionOutput::Text(format!(
        "SUCCESS: {} at {}",
        message,
        time.format("%-I:%M:%S %p")
    )))
}
