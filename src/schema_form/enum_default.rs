//! Default selection for enumerable widgets
//!
//! Runs once when a field instance is constructed, before its first render.

use serde_json::Value;
use tracing::debug;

use super::binding::ValueBinding;
use crate::domain::{schema_has_items, EnumOption, WidgetConfig};
use crate::error::Result;

/// Value to seed an enumerable field with, if any.
///
/// Applies only when there are options, the current value is undefined and the
/// first option carries a value. Multi-select (`items` present) starts as an
/// empty list, a required single select starts on its first option, and an
/// optional single select stays undefined.
pub fn enum_default(
    options: &[EnumOption],
    current: Option<&Value>,
    schema: &Value,
    required: bool,
) -> Option<Value> {
    let first = options.first()?;
    if current.is_some() {
        return None;
    }
    let first_value = first.value.as_ref()?;

    if schema_has_items(schema) {
        Some(Value::Array(Vec::new()))
    } else if required {
        Some(first_value.clone())
    } else {
        None
    }
}

/// Write the enum default through the binding. Returns the value written.
pub fn apply_enum_default(binding: &ValueBinding, config: &WidgetConfig) -> Result<Option<Value>> {
    let current = binding.read();
    let Some(default) = enum_default(
        &config.enum_options(),
        current.as_ref(),
        &config.schema,
        config.required,
    ) else {
        return Ok(None);
    };

    debug!(path = %config.cur_node_path, value = %default, "Applying enum default");
    binding.write(Some(default.clone()))?;
    Ok(Some(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options() -> Vec<EnumOption> {
        vec![
            EnumOption::from_value(&json!({ "label": "A", "value": "a" })),
            EnumOption::from_value(&json!({ "label": "B", "value": "b" })),
        ]
    }

    #[test]
    fn test_required_single_select_takes_first() {
        let schema = json!({ "type": "string", "enum": ["a", "b"] });
        assert_eq!(enum_default(&options(), None, &schema, true), Some(json!("a")));
    }

    #[test]
    fn test_multi_select_starts_empty() {
        let schema = json!({ "type": "array", "items": { "enum": ["a", "b"] } });
        assert_eq!(enum_default(&options(), None, &schema, true), Some(json!([])));
        assert_eq!(enum_default(&options(), None, &schema, false), Some(json!([])));
    }

    #[test]
    fn test_optional_single_select_stays_undefined() {
        let schema = json!({ "type": "string" });
        assert_eq!(enum_default(&options(), None, &schema, false), None);
    }

    #[test]
    fn test_existing_value_untouched() {
        let schema = json!({ "type": "string" });
        assert_eq!(enum_default(&options(), Some(&json!("b")), &schema, true), None);
        assert_eq!(enum_default(&options(), Some(&Value::Null), &schema, true), None);
    }

    #[test]
    fn test_no_options_or_valueless_first_option() {
        let schema = json!({ "type": "string" });
        assert_eq!(enum_default(&[], None, &schema, true), None);

        let valueless = vec![EnumOption::from_value(&json!({ "label": "?" }))];
        assert_eq!(enum_default(&valueless, None, &schema, true), None);
    }
}
