//! Core types shared by every custom function.
//!
//! A function receives raw JSON arguments from the host, normalizes them
//! into a [`Range`], works on typed values, and hands a [`FunctionResult`]
//! back. Only [`into_cell_value`] knows how errors look to the host.

pub mod cell;
pub mod error;
pub mod output;
pub mod range;

pub use cell::CellValue;
pub use error::FunctionError;
pub use output::{error_cell, into_cell_value, FunctionOutput, FunctionResult, ERROR_PREFIX};
pub use range::{normalize, Range};
