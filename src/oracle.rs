//! Collaborator seams for column type classification.
//!
//! The factory never inspects the fact model itself. It asks a [`TypeOracle`]
//! (normally the decision table) which in turn may consult a
//! [`CompletionEngine`] describing fact types, their fields and enumerations.

use serde::{Deserialize, Serialize};

use crate::column::ColumnDescriptor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Numeric,
    Boolean,
    Date,
    Object,
}

pub trait CompletionEngine {
    /// Declared type of `fact_type.field`, if the fact model knows it.
    fn field_type(&self, fact_type: &str, field: &str) -> Option<FieldType>;

    /// Enumerated values for `fact_type.field`; empty when the field is open.
    fn enum_values(&self, fact_type: &str, field: &str) -> Vec<String>;
}

pub trait TypeOracle {
    fn value_list(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine)
    -> Vec<String>;
    fn is_numeric(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool;
    fn is_boolean(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool;
    fn is_date(&self, column: &ColumnDescriptor, completions: &dyn CompletionEngine) -> bool;
}
