//! Bind values for parameterized statements.

use crate::error::QueryError;
use serde_json::Value;

/// Parameter value for prepared statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Binary data, sent hex encoded
    Binary(Vec<u8>),
}

impl Parameter {
    /// Encode the value for the `data` matrix of `executePreparedStatement`.
    ///
    /// `index` is the flat position of the value and only shows up in errors.
    pub fn to_json(&self, index: usize) -> Result<Value, QueryError> {
        match self {
            Parameter::Null => Ok(Value::Null),
            Parameter::Boolean(b) => Ok(Value::Bool(*b)),
            Parameter::Integer(i) => Ok(Value::from(*i)),
            Parameter::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .ok_or_else(|| QueryError::InvalidParameter {
                    index,
                    message: "NaN and Infinity are not supported".to_string(),
                }),
            Parameter::String(s) => Ok(Value::String(s.clone())),
            Parameter::Binary(b) => Ok(Value::String(hex::encode(b))),
        }
    }

    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Parameter::Null)
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Boolean(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Integer(value as i64)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Float(value)
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::String(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(value)
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map_or(Parameter::Null, Into::into)
    }
}
