//! Rule attribute vocabulary understood by attribute columns.
//!
//! Changing a name or a mapped type here changes how existing tables resolve,
//! so treat the table as versioned.

use crate::column::DataType;

pub const SALIENCE: &str = "salience";
pub const ENABLED: &str = "enabled";
pub const NO_LOOP: &str = "no-loop";
pub const DURATION: &str = "duration";
pub const AUTO_FOCUS: &str = "auto-focus";
pub const LOCK_ON_ACTIVE: &str = "lock-on-active";
pub const DATE_EFFECTIVE: &str = "date-effective";
pub const DATE_EXPIRES: &str = "date-expires";
pub const NEGATE_RULE: &str = "negate-rule";
pub const DIALECT: &str = "dialect";

pub const DIALECTS: &[&str] = &["java", "mvel"];
pub const DEFAULT_DIALECT: &str = "java";

const ATTRIBUTE_TYPES: &[(&str, DataType)] = &[
    (SALIENCE, DataType::Numeric),
    (ENABLED, DataType::Boolean),
    (NO_LOOP, DataType::Boolean),
    (DURATION, DataType::Numeric),
    (AUTO_FOCUS, DataType::Boolean),
    (LOCK_ON_ACTIVE, DataType::Boolean),
    (DATE_EFFECTIVE, DataType::Date),
    (DATE_EXPIRES, DataType::Date),
    (NEGATE_RULE, DataType::Boolean),
];

/// Fixed data type for a rule attribute. Unknown names (including `dialect`) are text.
pub fn attribute_data_type(name: &str) -> DataType {
    ATTRIBUTE_TYPES
        .iter()
        .find(|(attribute, _)| *attribute == name)
        .map(|(_, data_type)| *data_type)
        .unwrap_or(DataType::String)
}

pub fn is_known_dialect(value: &str) -> bool {
    DIALECTS.contains(&value)
}
