// Range normalization
// The host passes ranges as untyped JSON; everything downstream works on `Range`.

use serde::Serialize;
use serde_json::Value;

use crate::cell::CellValue;
use crate::error::FunctionError;

/// A non-empty rectangular grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Range {
    rows: Vec<Vec<CellValue>>,
}

impl Range {
    /// Build a range, checking it is non-empty and rectangular.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self, FunctionError> {
        let Some(first) = rows.first() else {
            return Err(FunctionError::invalid_range("range is empty"));
        };
        let width = first.len();
        if width == 0 {
            return Err(FunctionError::invalid_range("range has no columns"));
        }
        if let Some(idx) = rows.iter().position(|r| r.len() != width) {
            return Err(FunctionError::invalid_range(format!(
                "row {} has {} cells, expected {}",
                idx + 1,
                rows[idx].len(),
                width
            )));
        }
        Ok(Self { rows })
    }

    /// A 1×1 range.
    pub fn single(cell: impl Into<CellValue>) -> Self {
        Self { rows: vec![vec![cell.into()]] }
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.rows[0].len())
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }

    /// Apply `f` to every cell, stopping at the first error. The shape
    /// never changes.
    pub fn try_map_cells<F>(&self, mut f: F) -> Result<Range, FunctionError>
    where
        F: FnMut(&CellValue) -> Result<CellValue, FunctionError>,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(&mut f).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Range { rows })
    }

    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| Value::Array(row.iter().map(CellValue::to_json).collect()))
                .collect(),
        )
    }
}

/// Coerce a raw host argument into a [`Range`].
///
/// A flat array is a single row. Absent values, scalars, empty or ragged
/// arrays and nested cell values are rejected.
pub fn normalize(input: Option<&Value>) -> Result<Range, FunctionError> {
    let items = match input {
        None | Some(Value::Null) => {
            return Err(FunctionError::invalid_range("no range given"));
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(FunctionError::invalid_range("expected an array of rows"));
        }
    };

    let Some(first) = items.first() else {
        return Err(FunctionError::invalid_range("range is empty"));
    };

    if !first.is_array() {
        // Bare row
        let row = cells_of(items, 0)?;
        return Range::from_rows(vec![row]);
    }

    let mut rows = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let Value::Array(cells) = item else {
            return Err(FunctionError::invalid_range(format!(
                "row {} is not an array",
                idx + 1
            )));
        };
        rows.push(cells_of(cells, idx)?);
    }
    Range::from_rows(rows)
}

fn cells_of(values: &[Value], row_idx: usize) -> Result<Vec<CellValue>, FunctionError> {
    values
        .iter()
        .enumerate()
        .map(|(col_idx, v)| {
            CellValue::from_json(v).ok_or_else(|| {
                FunctionError::invalid_range(format!(
                    "cell at row {}, column {} is not a scalar",
                    row_idx + 1,
                    col_idx + 1
                ))
            })
        })
        .collect()
}
