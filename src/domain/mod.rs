//! Field configuration model
//!
//! `WidgetConfig` is the per-render input bundle of a field. Callers build a
//! fresh one on every render pass; the core only reads it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub mod vnode;

pub use vnode::{Attrs, ClassMap, StyleMap};

use crate::schema_form::registry::{ComponentRegistry, WidgetRef};
use crate::schema_form::relay::GetWidget;
use crate::schema_form::validation::CustomRule;
use crate::schema_form::validator::{CustomFormats, JsonSchemaValidator, SchemaValidator};

// ============================================================================
// Form-wide Props
// ============================================================================

/// Where labels sit relative to their input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Top,
    Left,
    Right,
}

/// Form-wide presentation preferences
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_position: Option<LabelPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_suffix: Option<String>,
}

// ============================================================================
// Enum Options
// ============================================================================

/// One entry of `uiProps.enumOptions`
#[derive(Clone, Debug, PartialEq)]
pub struct EnumOption {
    pub label: Option<String>,
    /// `None` when the option object has no `value` key at all
    pub value: Option<Value>,
}

impl EnumOption {
    pub fn from_value(option: &Value) -> Self {
        match option {
            Value::Object(obj) => Self {
                label: obj.get("label").and_then(|v| v.as_str()).map(String::from),
                value: obj.get("value").cloned(),
            },
            // Bare values are accepted as their own label
            other => Self {
                label: Some(match other {
                    Value::String(s) => s.clone(),
                    v => v.to_string(),
                }),
                value: Some(other.clone()),
            },
        }
    }
}

/// Read `enumOptions` out of a field's ui props
pub fn enum_options(ui_props: &Attrs) -> Vec<EnumOption> {
    ui_props
        .get("enumOptions")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().map(EnumOption::from_value).collect())
        .unwrap_or_default()
}

// ============================================================================
// Widget Config
// ============================================================================

/// Receives the normalized value after every write
pub type ChangeHandler = Arc<dyn Fn(Option<Value>) + Send + Sync>;

/// Per-render configuration of one field
#[derive(Clone)]
pub struct WidgetConfig {
    /// Bind to the shared form data tree (`true`) or to `cur_value` (`false`)
    pub is_form_data: bool,
    /// Value used when `is_form_data` is false
    pub cur_value: Option<Value>,
    pub schema: Value,
    pub ui_schema: Value,
    pub error_schema: Value,
    pub custom_formats: CustomFormats,
    pub custom_rule: Option<CustomRule>,
    pub widget: Option<WidgetRef>,
    pub required: bool,
    /// Substituted for `""` and `null` coming out of a widget
    pub empty_value: Option<Value>,
    pub cur_node_path: String,
    pub label: String,
    pub width: String,
    pub label_width: String,
    pub description: String,
    pub widget_attrs: Attrs,
    pub widget_class: ClassMap,
    pub widget_style: StyleMap,
    pub field_attrs: Attrs,
    pub field_class: ClassMap,
    pub field_style: StyleMap,
    pub ui_props: Attrs,
    pub form_props: Option<FormProps>,
    pub get_widget: Option<GetWidget>,
    pub on_change: Option<ChangeHandler>,
    pub registry: ComponentRegistry,
    pub validator: Arc<dyn SchemaValidator>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            is_form_data: true,
            cur_value: None,
            schema: Value::Object(Default::default()),
            ui_schema: Value::Object(Default::default()),
            error_schema: Value::Object(Default::default()),
            custom_formats: CustomFormats::new(),
            custom_rule: None,
            widget: None,
            required: false,
            empty_value: None,
            cur_node_path: String::new(),
            label: String::new(),
            width: String::new(),
            label_width: String::new(),
            description: String::new(),
            widget_attrs: Attrs::new(),
            widget_class: ClassMap::new(),
            widget_style: StyleMap::new(),
            field_attrs: Attrs::new(),
            field_class: ClassMap::new(),
            field_style: StyleMap::new(),
            ui_props: Attrs::new(),
            form_props: None,
            get_widget: None,
            on_change: None,
            registry: ComponentRegistry::default(),
            validator: Arc::new(JsonSchemaValidator),
        }
    }
}

impl WidgetConfig {
    pub fn enum_options(&self) -> Vec<EnumOption> {
        enum_options(&self.ui_props)
    }
}

/// Truthiness probe of `schema.items`
pub fn schema_has_items(schema: &Value) -> bool {
    match schema.get("items") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("is_form_data", &self.is_form_data)
            .field("cur_value", &self.cur_value)
            .field("cur_node_path", &self.cur_node_path)
            .field("widget", &self.widget)
            .field("required", &self.required)
            .field("empty_value", &self.empty_value)
            .field("label", &self.label)
            .field("custom_rule", &self.custom_rule.is_some())
            .field("form_props", &self.form_props)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_option_missing_value_is_undefined() {
        let option = EnumOption::from_value(&json!({ "label": "A" }));
        assert_eq!(option.value, None);

        let option = EnumOption::from_value(&json!({ "label": "N", "value": null }));
        assert_eq!(option.value, Some(Value::Null));
    }

    #[test]
    fn test_enum_options_from_ui_props() {
        let mut ui_props = Attrs::new();
        ui_props.insert(
            "enumOptions".to_string(),
            json!([{ "label": "A", "value": "a" }, "b"]),
        );
        let options = enum_options(&ui_props);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].value, Some(json!("a")));
        assert_eq!(options[1].label.as_deref(), Some("b"));
    }

    #[test]
    fn test_schema_has_items_truthiness() {
        assert!(schema_has_items(&json!({ "items": { "type": "string" } })));
        assert!(!schema_has_items(&json!({ "items": false })));
        assert!(!schema_has_items(&json!({ "type": "string" })));
    }

    #[test]
    fn test_label_position_serde() {
        let props: FormProps = serde_json::from_value(json!({ "label_position": "left" })).unwrap();
        assert_eq!(props.label_position, Some(LabelPosition::Left));
    }
}
