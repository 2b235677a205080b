//! Inclusion filtering over scored record sets.

use crate::types::{RecordSet, Value};
use tracing::debug;

/// Declarative inclusion filter: attribute name to allowed values.
///
/// Built fresh per reporting request. Attributes not mentioned impose no
/// constraint; an empty allowed list for a mentioned attribute is an explicit
/// exclusion that matches nothing.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    clauses: Vec<(String, Vec<Value>)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allowed-value clause for an attribute.
    pub fn allow(mut self, attribute: impl Into<String>, values: Vec<Value>) -> Self {
        self.clauses.push((attribute.into(), values));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[(String, Vec<Value>)] {
        &self.clauses
    }

    /// Parse a CLI clause of the form `attr=v1,v2`.
    ///
    /// Values go through the same inference as CSV fields so membership
    /// comparison sees the same types the record set carries.
    pub fn parse_clause(clause: &str) -> anyhow::Result<(String, Vec<Value>)> {
        let (attribute, raw_values) = clause
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected `attr=v1,v2`, got `{clause}`"))?;
        if attribute.is_empty() {
            anyhow::bail!("empty attribute name in filter `{clause}`");
        }
        let values = raw_values
            .split(',')
            .filter(|v| !v.is_empty())
            .map(Value::parse)
            .collect();
        Ok((attribute.to_string(), values))
    }
}

/// Applies a [`FilterSpec`] to a record set, selecting a subsequence.
pub struct FilterEngine;

impl FilterEngine {
    pub fn new() -> Self {
        Self
    }

    /// Keep the records matching every clause, preserving relative order.
    ///
    /// Never fails and never mutates records. A clause naming an attribute
    /// absent from the schema is a no-op, matching the rule that filters are
    /// only ever built from attributes actually observed in the data.
    pub fn apply(&self, records: &RecordSet, spec: &FilterSpec) -> RecordSet {
        if spec.is_empty() {
            return records.clone();
        }

        // Resolve clauses against the schema once; unknown attributes drop out.
        let active: Vec<(usize, &Vec<Value>)> = spec
            .clauses()
            .iter()
            .filter_map(|(attr, allowed)| {
                records.column_index(attr).map(|idx| (idx, allowed))
            })
            .collect();

        let indices: Vec<usize> = records
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                active
                    .iter()
                    .all(|(idx, allowed)| allowed.contains(&row[*idx]))
            })
            .map(|(i, _)| i)
            .collect();

        debug!(
            input = records.len(),
            output = indices.len(),
            clauses = spec.clauses().len(),
            "Filter applied"
        );

        records.take_rows(&indices)
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::tests::sample_orders;
    use crate::types::columns;

    #[test]
    fn test_empty_spec_returns_input_unchanged() {
        let rs = sample_orders();
        let filtered = FilterEngine::new().apply(&rs, &FilterSpec::new());
        assert_eq!(filtered, rs);
    }

    #[test]
    fn test_membership_filtering_preserves_order() {
        let rs = sample_orders();
        let spec = FilterSpec::new().allow(
            columns::PRIORITY,
            vec![Value::from("High"), Value::from("Medium")],
        );
        let filtered = FilterEngine::new().apply(&rs, &spec);

        let ids: Vec<&Value> = filtered.column_values(columns::ORDER_ID).unwrap();
        assert_eq!(
            ids,
            vec![&Value::from("ord-1"), &Value::from("ord-3"), &Value::from("ord-4")]
        );
    }

    #[test]
    fn test_empty_allowed_set_matches_nothing() {
        let rs = sample_orders();
        let spec = FilterSpec::new().allow(columns::PRIORITY, Vec::new());
        assert!(FilterEngine::new().apply(&rs, &spec).is_empty());
    }

    #[test]
    fn test_unknown_attribute_clause_is_noop() {
        let rs = sample_orders();
        let spec = FilterSpec::new().allow("warehouse", vec![Value::from("WH-1")]);
        assert_eq!(FilterEngine::new().apply(&rs, &spec).len(), rs.len());
    }

    #[test]
    fn test_conjunction_of_clauses() {
        let rs = sample_orders();
        let spec = FilterSpec::new()
            .allow(columns::PRIORITY, vec![Value::from("High")])
            .allow(columns::PRODUCT_CATEGORY, vec![Value::from("Electronics")]);
        let filtered = FilterEngine::new().apply(&rs, &spec);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_parse_clause() {
        let (attr, values) = FilterSpec::parse_clause("priority=High,Low").unwrap();
        assert_eq!(attr, "priority");
        assert_eq!(values, vec![Value::from("High"), Value::from("Low")]);

        let (_, numeric) = FilterSpec::parse_clause("distance_km=30").unwrap();
        assert_eq!(numeric, vec![Value::Int(30)]);

        assert!(FilterSpec::parse_clause("no-equals-sign").is_err());
        assert!(FilterSpec::parse_clause("=High").is_err());
    }

    #[test]
    fn test_numeric_clause_matches_float_cells() {
        let rs = sample_orders();
        // distance_km cells are floats; an integer filter value still matches
        let spec = FilterSpec::new().allow(columns::DISTANCE_KM, vec![Value::Int(30)]);
        let filtered = FilterEngine::new().apply(&rs, &spec);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.value(0, columns::ORDER_ID), Some(&Value::from("ord-2")));
    }
}
