//! Prepared statement handling for parameterized queries.
//!
//! Bound values are sent column-major: a flat argument list `[a0, b0, a1, b1]`
//! for a statement with two parameters becomes `[[a0, a1], [b0, b1]]`.

use crate::error::QueryError;
use crate::query::statement::Parameter;
use crate::transport::messages::{ColumnInfo, CreatePreparedStatementResponse};
use crate::transport::Command;
use serde_json::Value;

/// A server-side prepared statement.
///
/// Created by [`Connection::prepare`](crate::Connection::prepare) and released
/// by [`Connection::close_prepared`](crate::Connection::close_prepared), which
/// consumes it so a closed handle cannot be used again.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    /// Server-side handle
    handle: i64,
    /// Bind parameter descriptors, in bind order
    columns: Vec<ColumnInfo>,
}

impl PreparedStatement {
    /// Create a new PreparedStatement from a handle and its parameter columns.
    pub fn new(handle: i64, columns: Vec<ColumnInfo>) -> Self {
        Self { handle, columns }
    }

    /// Get the statement handle.
    pub fn handle(&self) -> i64 {
        self.handle
    }

    /// Get the number of parameters in this prepared statement.
    pub fn parameter_count(&self) -> usize {
        self.columns.len()
    }

    /// Bind parameter descriptors.
    pub fn parameter_columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// `executePreparedStatement` for `args`.
    ///
    /// # Errors
    ///
    /// `QueryError::InvalidValuesCount` when `args` does not fill whole rows.
    pub(crate) fn execute_command(&self, args: &[Parameter]) -> Result<Command, QueryError> {
        let num_columns = self.parameter_count();
        let data = build_argument_matrix(args, num_columns)?;
        let num_rows = if num_columns == 0 { 0 } else { args.len() / num_columns };

        Ok(Command::ExecutePreparedStatement {
            statement_handle: self.handle,
            num_columns,
            num_rows,
            columns: self.columns.clone(),
            data,
        })
    }

    pub(crate) fn close_command(&self) -> Command {
        Command::ClosePreparedStatement {
            statement_handle: self.handle,
        }
    }
}

impl From<CreatePreparedStatementResponse> for PreparedStatement {
    fn from(response: CreatePreparedStatementResponse) -> Self {
        let columns = response
            .parameter_data
            .map(|parameters| parameters.columns)
            .unwrap_or_default();
        Self::new(response.statement_handle, columns)
    }
}

/// Reshape a flat argument list into one sequence per column.
///
/// Value `i` lands in column `i % num_columns`, so `matrix[c][r]` is
/// `args[r * num_columns + c]`.
///
/// # Errors
///
/// `QueryError::InvalidValuesCount` when `args.len()` is not a multiple of
/// `num_columns`, or when values are given for a statement without
/// parameters. `QueryError::InvalidParameter` when a value cannot be encoded.
pub fn build_argument_matrix(
    args: &[Parameter],
    num_columns: usize,
) -> Result<Vec<Vec<Value>>, QueryError> {
    if num_columns == 0 {
        if args.is_empty() {
            return Ok(Vec::new());
        }
        return Err(QueryError::InvalidValuesCount {
            values: args.len(),
            columns: 0,
        });
    }
    if args.len() % num_columns != 0 {
        return Err(QueryError::InvalidValuesCount {
            values: args.len(),
            columns: num_columns,
        });
    }

    let num_rows = args.len() / num_columns;
    let mut matrix: Vec<Vec<Value>> = (0..num_columns)
        .map(|_| Vec::with_capacity(num_rows))
        .collect();
    for (i, arg) in args.iter().enumerate() {
        matrix[i % num_columns].push(arg.to_json(i)?);
    }
    Ok(matrix)
}
