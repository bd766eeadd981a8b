//! Result set handling and iteration.
//!
//! An execution returns a [`ResultSet`] holding one [`QueryResult`] per
//! statement. Row data is row-major and complete by the time a caller sees it.

use crate::error::QueryError;
use crate::transport::messages::{ColumnInfo, ResultSetData};
use crate::transport::{SqlQueriesResponse, SqlResult};
use serde_json::Value;

/// Rows and column descriptors of a row-returning result.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<Value>>,
    /// Total number of rows the server reported
    total_rows: u64,
    /// Open server-side handle while rows remain to be fetched or released
    handle: Option<i64>,
}

impl RowSet {
    /// Create a complete row set.
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            total_rows: rows.len() as u64,
            columns,
            rows,
            handle: None,
        }
    }

    /// Column descriptors.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Rows received so far.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Total number of rows of the result.
    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    /// Whether every row has been received.
    pub fn is_complete(&self) -> bool {
        self.rows.len() as u64 >= self.total_rows
    }

    /// Server-side handle that still has to be released.
    pub(crate) fn handle(&self) -> Option<i64> {
        self.handle
    }

    pub(crate) fn append(&mut self, rows: Vec<Vec<Value>>) {
        self.rows.extend(rows);
    }

    pub(crate) fn release_handle(&mut self) -> Option<i64> {
        self.handle.take()
    }
}

impl From<ResultSetData> for RowSet {
    fn from(data: ResultSetData) -> Self {
        Self {
            columns: data.columns,
            rows: data.data.unwrap_or_default(),
            total_rows: data.num_rows,
            handle: data.result_set_handle,
        }
    }
}

/// One logical result of an execution.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Row-returning result (SELECT)
    RowSet(RowSet),
    /// Row count result (INSERT, UPDATE, DELETE, DDL)
    RowCount(i64),
}

impl From<SqlResult> for QueryResult {
    fn from(result: SqlResult) -> Self {
        match result {
            SqlResult::ResultSet { result_set } => QueryResult::RowSet(result_set.into()),
            SqlResult::RowCount { row_count } => QueryResult::RowCount(row_count),
        }
    }
}

/// Results of one execution, in statement order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    results: Vec<QueryResult>,
}

impl ResultSet {
    /// Build from the reply of `execute` or `executePreparedStatement`.
    ///
    /// # Errors
    ///
    /// `QueryError::MalformedResponse` when the reply holds no result.
    pub fn from_response(response: SqlQueriesResponse) -> Result<Self, QueryError> {
        if response.num_results == 0 || response.results.is_empty() {
            return Err(QueryError::MalformedResponse(
                "execution returned zero results".to_string(),
            ));
        }
        Ok(Self {
            results: response.results.into_iter().map(QueryResult::from).collect(),
        })
    }

    /// Number of logical results.
    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    /// All results.
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    pub(crate) fn row_sets_mut(&mut self) -> impl Iterator<Item = &mut RowSet> {
        self.results.iter_mut().filter_map(|result| match result {
            QueryResult::RowSet(rows) => Some(rows),
            QueryResult::RowCount(_) => None,
        })
    }

    /// Sum of all update counts.
    pub fn rows_affected(&self) -> i64 {
        self.results
            .iter()
            .map(|result| match result {
                QueryResult::RowCount(count) => *count,
                QueryResult::RowSet(_) => 0,
            })
            .sum()
    }

    /// Cursor over the first row-returning result.
    ///
    /// # Errors
    ///
    /// `QueryError::NoResultSet` when no result returns rows.
    pub fn into_rows(self) -> Result<Rows, QueryError> {
        self.results
            .into_iter()
            .find_map(|result| match result {
                QueryResult::RowSet(rows) => Some(Rows::from(rows)),
                QueryResult::RowCount(_) => None,
            })
            .ok_or_else(|| QueryError::NoResultSet("statement did not return rows".to_string()))
    }
}

/// Outcome of a statement run for its side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecResult {
    rows_affected: i64,
}

impl ExecResult {
    /// Number of rows inserted, updated or deleted.
    pub fn rows_affected(&self) -> i64 {
        self.rows_affected
    }
}

impl From<&ResultSet> for ExecResult {
    fn from(result_set: &ResultSet) -> Self {
        Self {
            rows_affected: result_set.rows_affected(),
        }
    }
}

/// Row cursor over a row-returning result.
#[derive(Debug)]
pub struct Rows {
    columns: Vec<ColumnInfo>,
    rows: std::vec::IntoIter<Vec<Value>>,
}

impl Rows {
    /// Column descriptors.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Column names, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl From<RowSet> for Rows {
    fn from(row_set: RowSet) -> Self {
        Self {
            columns: row_set.columns,
            rows: row_set.rows.into_iter(),
        }
    }
}

impl Iterator for Rows {
    type Item = Vec<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Rows {}
