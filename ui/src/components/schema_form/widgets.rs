//! Input Widgets
//!
//! Built-in inputs driven by the node's model binding. Values are committed
//! on `change`, so a field re-rendering after a write never steals focus
//! from the input being typed in.

use leptos::prelude::*;
use leptos::web_sys;
use schemaform::domain::vnode::{style_string, ModelBinding, VNode};
use schemaform::domain::{enum_options, EnumOption};
use schemaform::schema_form::{InstanceHandle, InstanceHandleRelay};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::renderer::attr_str;

const INPUT_CLASS: &str =
    "w-full px-3 py-2 text-sm border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500";

static NEXT_MOUNT: AtomicU64 = AtomicU64::new(1);

/// Instance handle this host hands to `get_widget` callbacks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetInstance {
    /// Component handle of the mounted widget
    pub component: &'static str,
    /// Unique per mount
    pub mount_id: u64,
}

impl WidgetInstance {
    fn next(component: &'static str) -> Self {
        Self {
            component,
            mount_id: NEXT_MOUNT.fetch_add(1, Ordering::Relaxed),
        }
    }
}

/// Relay this widget's instance once it is mounted, release it on unmount
fn relay_instance(relay: Option<Arc<InstanceHandleRelay>>, component: &'static str) {
    let Some(relay) = relay else {
        return;
    };
    let handle = InstanceHandle::new(WidgetInstance::next(component));

    let on_mount = relay.clone();
    Effect::new(move |_| {
        on_mount.notify(handle.clone());
    });
    on_cleanup(move || relay.release());
}

fn commit(model: &Option<ModelBinding>, value: Option<Value>) {
    if let Some(model) = model {
        model.update(value);
    }
}

// ============================================================================
// Value Helpers
// ============================================================================

/// Text shown in an input for a bound value
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Number typed into a number input; text that is not a number is kept
/// as-is so schema validation can report it
pub fn parse_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return json!(n);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => json!(n),
        _ => Value::String(raw.to_string()),
    }
}

/// Checkbox group selection after one option is toggled
pub fn toggle_value(current: &[Value], value: &Value, checked: bool) -> Vec<Value> {
    let mut next: Vec<Value> = current.iter().filter(|v| *v != value).cloned().collect();
    if checked {
        next.push(value.clone());
    }
    next
}

/// Option text, falling back to the value itself
pub fn option_label(option: &EnumOption) -> String {
    option
        .label
        .clone()
        .unwrap_or_else(|| display_value(option.value.as_ref()))
}

/// Index of the selected option, if the value is one of them
pub fn selected_index(options: &[EnumOption], value: Option<&Value>) -> Option<usize> {
    let value = value?;
    options
        .iter()
        .position(|option| option.value.as_ref() == Some(value))
}

// ============================================================================
// Text Input
// ============================================================================

#[component]
pub fn TextInput(node: VNode) -> impl IntoView {
    let class = format!("{} {}", INPUT_CLASS, node.class_string());
    let style = style_string(&node.style);
    let placeholder = attr_str(&node.attrs, "placeholder");
    let input_type = attr_str(&node.attrs, "type").unwrap_or_else(|| "text".to_string());
    let model = node.model;
    let value = display_value(model.as_ref().and_then(|m| m.value.as_ref()));
    relay_instance(node.instance_ref, "input");

    view! {
        <input
            type=input_type
            class=class
            style=style
            placeholder=placeholder
            prop:value=value
            on:change=move |ev| commit(&model, Some(Value::String(event_target_value(&ev))))
        />
    }
}

// ============================================================================
// Number Input
// ============================================================================

#[component]
pub fn NumberInput(node: VNode) -> impl IntoView {
    let class = format!("{} {}", INPUT_CLASS, node.class_string());
    let style = style_string(&node.style);
    let step = node
        .attrs
        .get("step")
        .map(|v| display_value(Some(v)))
        .unwrap_or_else(|| "any".to_string());
    let model = node.model;
    let value = display_value(model.as_ref().and_then(|m| m.value.as_ref()));
    relay_instance(node.instance_ref, "number-input");

    view! {
        <input
            type="number"
            step=step
            class=class
            style=style
            prop:value=value
            on:change=move |ev| {
                let raw = event_target_value(&ev);
                // Empty input goes through the binding's empty-value rule
                let value = if raw.is_empty() {
                    Value::String(raw)
                } else {
                    parse_number(&raw)
                };
                commit(&model, Some(value));
            }
        />
    }
}

// ============================================================================
// Select
// ============================================================================

#[component]
pub fn SelectInput(node: VNode) -> impl IntoView {
    let class = format!("{} {}", INPUT_CLASS, node.class_string());
    let style = style_string(&node.style);
    let placeholder = attr_str(&node.attrs, "placeholder").unwrap_or_else(|| "-- Select --".to_string());
    let options = enum_options(&node.attrs);
    let model = node.model;
    let selected = selected_index(&options, model.as_ref().and_then(|m| m.value.as_ref()));
    relay_instance(node.instance_ref, "select");

    let values: Vec<Option<Value>> = options.iter().map(|o| o.value.clone()).collect();
    let on_change = move |ev: web_sys::Event| {
        let picked = event_target_value(&ev)
            .parse::<usize>()
            .ok()
            .and_then(|idx| values.get(idx).cloned().flatten());
        commit(&model, Some(picked.unwrap_or_else(|| Value::String(String::new()))));
    };

    view! {
        <select class=class style=style on:change=on_change>
            <option value="" selected=selected.is_none()>{placeholder}</option>
            {options.into_iter().enumerate().map(|(idx, option)| {
                let label = option_label(&option);
                view! {
                    <option value=idx.to_string() selected=selected == Some(idx)>
                        {label}
                    </option>
                }
            }).collect_view()}
        </select>
    }
}

// ============================================================================
// Checkbox Group
// ============================================================================

#[component]
pub fn CheckboxGroup(node: VNode) -> impl IntoView {
    let class = format!("space-y-1 {}", node.class_string());
    let style = style_string(&node.style);
    let options = enum_options(&node.attrs);
    let model = node.model;
    let current: Vec<Value> = model
        .as_ref()
        .and_then(|m| m.value.as_ref())
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    relay_instance(node.instance_ref, "checkbox-group");

    view! {
        <div class=class style=style>
            {options.into_iter().filter_map(|option| {
                let label = option_label(&option);
                let value = option.value?;
                let checked = current.contains(&value);
                let current = current.clone();
                let model = model.clone();
                Some(view! {
                    <label class="flex items-center gap-2 text-sm">
                        <input
                            type="checkbox"
                            prop:checked=checked
                            on:change=move |ev| {
                                let next = toggle_value(&current, &value, event_target_checked(&ev));
                                commit(&model, Some(Value::Array(next)));
                            }
                        />
                        {label}
                    </label>
                })
            }).collect_view()}
        </div>
    }
}
