//! Record set: an ordered batch of order records sharing one schema.

use crate::error::{PipelineError, Result};
use crate::types::value::Value;

/// Optional attributes the pipeline knows how to interpret. Anything else is
/// passed through untouched.
pub mod columns {
    /// Ground-truth label; stripped before inference.
    pub const IS_DELAYED: &str = "is_delayed";
    pub const PRIORITY: &str = "priority";
    pub const PRODUCT_CATEGORY: &str = "product_category";
    pub const DISTANCE_KM: &str = "distance_km";
    pub const ORDER_ID: &str = "order_id";

    /// Derived column: per-record delay probability, full precision.
    pub const DELAY_PROBABILITY: &str = "Predicted Delay Probability";
    /// Derived column: discrete risk category label.
    pub const DELAY_CATEGORY: &str = "Predicted Delay Category";
}

/// An ordered collection of records sharing a common attribute set.
///
/// Stored column-major-by-name, row-major-by-value: the schema is a single
/// ordered list of column names and every row holds exactly one value per
/// column. Stages return new `RecordSet`s rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append one record. The row must match the schema width.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::ColumnLength {
                column: String::from("<row>"),
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PipelineError::missing_attribute(name))?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Structural copy with one additional column appended to every record.
    pub fn with_column(&self, name: &str, values: Vec<Value>) -> Result<RecordSet> {
        if self.has_column(name) {
            return Err(PipelineError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        if values.len() != self.rows.len() {
            return Err(PipelineError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                got: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Ok(RecordSet { columns, rows })
    }

    /// Structural copy with `name` removed from every record; a copy of the
    /// input when the column is absent.
    pub fn without_column(&self, name: &str) -> RecordSet {
        match self.column_index(name) {
            None => self.clone(),
            Some(idx) => {
                let mut columns = self.columns.clone();
                columns.remove(idx);
                let rows = self
                    .rows
                    .iter()
                    .map(|row| {
                        let mut row = row.clone();
                        row.remove(idx);
                        row
                    })
                    .collect();
                RecordSet { columns, rows }
            }
        }
    }

    /// Subsequence of rows by index, preserving the given order.
    pub fn take_rows(&self, indices: &[usize]) -> RecordSet {
        RecordSet {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small order batch shared by tests across the crate.
    pub(crate) fn sample_orders() -> RecordSet {
        let mut rs = RecordSet::new(vec![
            columns::ORDER_ID.to_string(),
            columns::PRIORITY.to_string(),
            columns::PRODUCT_CATEGORY.to_string(),
            columns::DISTANCE_KM.to_string(),
        ]);
        let rows = [
            ("ord-1", "High", "Electronics", 120.5),
            ("ord-2", "Low", "Furniture", 30.0),
            ("ord-3", "High", "Electronics", 410.0),
            ("ord-4", "Medium", "Groceries", 12.25),
        ];
        for (id, priority, category, km) in rows {
            rs.push_row(vec![
                Value::from(id),
                Value::from(priority),
                Value::from(category),
                Value::Float(km),
            ])
            .unwrap();
        }
        rs
    }

    #[test]
    fn test_column_access() {
        let rs = sample_orders();
        assert_eq!(rs.len(), 4);
        assert!(rs.has_column(columns::PRIORITY));
        assert!(!rs.has_column(columns::IS_DELAYED));
        assert_eq!(
            rs.value(1, columns::PRODUCT_CATEGORY),
            Some(&Value::from("Furniture"))
        );
        assert_eq!(rs.value(9, columns::PRIORITY), None);
    }

    #[test]
    fn test_with_column_appends_in_row_order() {
        let rs = sample_orders();
        let enriched = rs
            .with_column("score", vec![0.1.into(), 0.2.into(), 0.3.into(), 0.4.into()])
            .unwrap();
        assert_eq!(enriched.columns().last().map(String::as_str), Some("score"));
        assert_eq!(enriched.value(2, "score"), Some(&Value::Float(0.3)));
        // the source set is untouched
        assert!(!rs.has_column("score"));
    }

    #[test]
    fn test_with_column_rejects_bad_shapes() {
        let rs = sample_orders();
        assert!(matches!(
            rs.with_column("score", vec![0.5.into()]),
            Err(PipelineError::ColumnLength { .. })
        ));
        let values: Vec<Value> = (0..4).map(|i| Value::Int(i)).collect();
        assert!(matches!(
            rs.with_column(columns::PRIORITY, values),
            Err(PipelineError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_without_column_copies_when_absent() {
        let rs = sample_orders();
        let projected = rs.without_column(columns::IS_DELAYED);
        assert_eq!(projected, rs);
    }

    #[test]
    fn test_take_rows_preserves_order() {
        let rs = sample_orders();
        let subset = rs.take_rows(&[3, 0]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.value(0, columns::ORDER_ID), Some(&Value::from("ord-4")));
        assert_eq!(subset.value(1, columns::ORDER_ID), Some(&Value::from("ord-1")));
    }
}
