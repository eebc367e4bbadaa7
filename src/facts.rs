//! Fact model catalogue used to answer completion queries.
//!
//! A [`FactSchema`] maps fact type names to their fields. Each field has a
//! [`FieldType`] and, optionally, a closed list of values:
//!
//! ```yaml
//! Driver:
//!   age: { type: numeric }
//!   risk: { type: string, values: [low, medium, high] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::oracle::{CompletionEngine, FieldType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl FieldSpec {
    pub fn typed(field_type: FieldType) -> Self {
        Self {
            field_type,
            values: Vec::new(),
        }
    }

    pub fn enumerated<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_type: FieldType::String,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactSchema {
    facts: BTreeMap<String, BTreeMap<String, FieldSpec>>,
}

impl FactSchema {
    pub const fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, fact_type: &str, field: &str, spec: FieldSpec) -> Self {
        self.insert(fact_type, field, spec);
        self
    }

    pub fn insert(&mut self, fact_type: &str, field: &str, spec: FieldSpec) {
        self.facts
            .entry(fact_type.to_string())
            .or_default()
            .insert(field.to_string(), spec);
    }

    pub fn field(&self, fact_type: &str, field: &str) -> Option<&FieldSpec> {
        self.facts.get(fact_type).and_then(|fields| fields.get(field))
    }

    pub fn fact_types(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl CompletionEngine for FactSchema {
    fn field_type(&self, fact_type: &str, field: &str) -> Option<FieldType> {
        self.field(fact_type, field).map(|spec| spec.field_type)
    }

    fn enum_values(&self, fact_type: &str, field: &str) -> Vec<String> {
        self.field(fact_type, field)
            .map(|spec| spec.values.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_fields_from_yaml() {
        let yaml = "Driver:\n  age: { type: numeric }\n  risk: { values: [low, high] }\n";
        let schema: FactSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.field_type("Driver", "age"), Some(FieldType::Numeric));
        assert_eq!(schema.field_type("Driver", "risk"), Some(FieldType::String));
        assert_eq!(schema.enum_values("Driver", "risk"), vec!["low", "high"]);
        assert!(schema.enum_values("Driver", "age").is_empty());
        assert_eq!(schema.field_type("Vehicle", "age"), None);
    }

    #[test]
    fn builder_collects_fact_types() {
        let schema = FactSchema::new()
            .with_field("Policy", "approved", FieldSpec::typed(FieldType::Boolean))
            .with_field("Driver", "tier", FieldSpec::enumerated(["gold", "silver"]));
        assert_eq!(schema.fact_types().collect::<Vec<_>>(), vec!["Driver", "Policy"]);
        assert!(!schema.is_empty());
    }
}
