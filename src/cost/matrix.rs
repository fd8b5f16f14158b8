//! Dense vehicle-location × zone cost matrix.

use std::str::FromStr;

use thiserror::Error;

use super::{CostOracle, MoveCost, OracleFailure};
use crate::models::{Vehicle, ZoneId};

/// Failure to parse a cost matrix from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixParseError {
    /// A token does not parse as a number.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// Token that failed to parse.
        token: String,
    },

    /// A row's width differs from the first row.
    #[error("line {line}: expected {expected} columns, found {found}")]
    RaggedRow {
        /// 1-based line number.
        line: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },

    /// Content follows the blank line that ends the matrix.
    #[error("line {line}: non-empty line after the end of the matrix")]
    TrailingContent {
        /// 1-based line number.
        line: usize,
    },
}

/// A dense `rows × cols` cost matrix stored in row-major order.
///
/// Rows are vehicle locations, columns are zone indices
/// (`ZoneId(c)` reads column `c`). `f64::INFINITY` marks an unreachable
/// pair.
///
/// # Examples
///
/// ```
/// use u_rebalancing::cost::{CostMatrix, CostOracle, MoveCost};
/// use u_rebalancing::models::{Vehicle, VehicleId, ZoneId};
///
/// let cm: CostMatrix = "0 5\n3 inf\n".parse().unwrap();
/// assert_eq!(cm.rows(), 2);
/// assert_eq!(cm.get(0, 1), 5.0);
///
/// let v = Vehicle::new(VehicleId(0), 1);
/// assert_eq!(cm.cost(&v, ZoneId(1)).unwrap(), MoveCost::Unreachable);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl CostMatrix {
    /// Creates a matrix of the given shape, initialized to zero.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Creates a matrix from explicit row-major data.
    ///
    /// Returns `None` if the data length doesn't match `rows * cols`.
    pub fn from_data(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != rows * cols {
            return None;
        }
        Some(Self { data, rows, cols })
    }

    /// Parses whitespace-separated rows, one per line.
    ///
    /// Leading blank lines are skipped; the first blank line after a row
    /// ends the matrix and only blank lines may follow. `inf` is accepted
    /// for unreachable pairs.
    pub fn parse(text: &str) -> Result<Self, MatrixParseError> {
        let mut data = Vec::new();
        let mut cols = 0;
        let mut rows = 0;
        let mut ended = false;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();

            if ended {
                if !tokens.is_empty() {
                    return Err(MatrixParseError::TrailingContent { line: line_no });
                }
                continue;
            }
            if tokens.is_empty() {
                ended = rows > 0;
                continue;
            }

            if rows == 0 {
                cols = tokens.len();
            } else if tokens.len() != cols {
                return Err(MatrixParseError::RaggedRow {
                    line: line_no,
                    expected: cols,
                    found: tokens.len(),
                });
            }

            for token in tokens {
                let value = f64::from_str(token).map_err(|_| MatrixParseError::InvalidNumber {
                    line: line_no,
                    token: token.to_string(),
                })?;
                data.push(value);
            }
            rows += 1;
        }

        Ok(Self { data, rows, cols })
    }

    /// Returns the cost from location `row` into zone `col`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Sets the cost from location `row` into zone `col`.
    pub fn set(&mut self, row: usize, col: usize, cost: f64) {
        self.data[row * self.cols + col] = cost;
    }

    /// Marks the pair as unreachable.
    pub fn set_unreachable(&mut self, row: usize, col: usize) {
        self.set(row, col, f64::INFINITY);
    }

    /// Number of locations (rows).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of zones (columns).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the `cols × rows` transpose.
    pub fn transposed(&self) -> Self {
        let mut t = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.set(c, r, self.get(r, c));
            }
        }
        t
    }
}

impl FromStr for CostMatrix {
    type Err = MatrixParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl CostOracle for CostMatrix {
    fn cost(&self, vehicle: &Vehicle, zone: ZoneId) -> Result<MoveCost, OracleFailure> {
        let row = vehicle.location();
        if row >= self.rows || zone.0 >= self.cols {
            return Err(OracleFailure::new(format!(
                "no entry for location {row} and {zone} in a {}x{} matrix",
                self.rows, self.cols
            )));
        }
        Ok(MoveCost::from_value(self.get(row, zone.0)))
    }
}
