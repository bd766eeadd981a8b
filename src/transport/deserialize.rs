//! Decoding of column-major result data.
//!
//! Exasol ships row data column by column: `data[c][r]` is the value of
//! column `c` in row `r`. Results are handed to callers row by row, so the
//! visitor below writes each incoming value straight into its row instead of
//! materialising the columns first.

use serde::de::{self, DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde_json::Value;
use std::fmt;

/// Deserialize column-major data into rows.
///
/// Use with `#[serde(deserialize_with = "to_row_major")]`. All columns must
/// have the same length; ragged input is rejected.
pub fn to_row_major<'de, D>(deserializer: D) -> Result<Vec<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_seq(ColumnsVisitor)
}

/// Optional variant of [`to_row_major`]; `null` decodes to `None`.
pub fn to_row_major_option<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<Value>>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionVisitor;

    impl<'de> Visitor<'de> for OptionVisitor {
        type Value = Option<Vec<Vec<Value>>>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("null or an array of columns")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            to_row_major(d).map(Some)
        }
    }

    deserializer.deserialize_option(OptionVisitor)
}

struct ColumnsVisitor;

impl<'de> Visitor<'de> for ColumnsVisitor {
    type Value = Vec<Vec<Value>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of columns")
    }

    fn visit_seq<A>(self, mut columns: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut rows: Vec<Vec<Value>> = Vec::new();
        let mut column = 0;
        while columns
            .next_element_seed(ColumnInto {
                rows: &mut rows,
                column,
            })?
            .is_some()
        {
            column += 1;
        }
        Ok(rows)
    }
}

/// Appends one column to the rows collected so far.
struct ColumnInto<'a> {
    rows: &'a mut Vec<Vec<Value>>,
    column: usize,
}

impl<'de, 'a> DeserializeSeed<'de> for ColumnInto<'a> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'a> Visitor<'de> for ColumnInto<'a> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of column values")
    }

    fn visit_seq<A>(self, mut values: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut row = 0;
        while let Some(value) = values.next_element::<Value>()? {
            if self.column == 0 {
                self.rows.push(vec![value]);
            } else {
                match self.rows.get_mut(row) {
                    Some(cells) => cells.push(value),
                    None => {
                        return Err(de::Error::custom(format!(
                            "column {} has more values than column 0",
                            self.column
                        )))
                    }
                }
            }
            row += 1;
        }

        if self.column > 0 && row != self.rows.len() {
            return Err(de::Error::custom(format!(
                "column {} has {} values, expected {}",
                self.column,
                row,
                self.rows.len()
            )));
        }
        Ok(())
    }
}
