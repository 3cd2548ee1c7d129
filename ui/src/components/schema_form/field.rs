//! Field and Form Components
//!
//! `SchemaForm` owns the reactive form data and lays out one `Field` per
//! top-level schema property. Each `Field` constructs its engine widget once
//! and re-renders the widget's node tree whenever its own value changes.

use leptos::prelude::*;
use schemaform::domain::{FormProps, LabelPosition, WidgetConfig};
use schemaform::schema_form::{
    property_names, ComponentRegistry, FormDataStore, SchemaLocator, Widget,
};
use serde_json::Value;
use std::sync::Arc;

use super::renderer::{builtin_registry, render_node};
use super::store::{FieldState, FormContext, SignalFormData};

// ============================================================================
// Field
// ============================================================================

#[component]
pub fn Field(config: WidgetConfig) -> impl IntoView {
    let Some(form) = use_context::<FormContext>() else {
        log::error!("Field '{}' rendered outside a SchemaForm", config.cur_node_path);
        return ().into_any();
    };
    let store = form.store;

    let widget = match Widget::new(&config, Arc::new(store)) {
        Ok(widget) => widget,
        Err(e) => {
            log::error!("Failed to set up field '{}': {}", config.cur_node_path, e);
            return view! {
                <p class="formItemErrorBox text-sm text-red-600">{e.to_string()}</p>
            }
            .into_any();
        }
    };
    provide_context(FieldState::new());

    let path = config.cur_node_path.clone();
    let current = Memo::new(move |_| store.get(&path));

    (move || {
        current.track();
        render_node(untrack(|| widget.render(&config)))
    })
    .into_any()
}

// ============================================================================
// Schema Form
// ============================================================================

/// Caller hook adjusting each derived field config (custom rules, widget callbacks)
pub type FieldCustomizer = Arc<dyn Fn(&mut WidgetConfig) + Send + Sync>;

/// Configs of the top-level fields of `schema`
pub fn field_configs(
    schema: &Value,
    registry: &ComponentRegistry,
    form_props: &FormProps,
    customize: Option<&FieldCustomizer>,
) -> Vec<WidgetConfig> {
    let locator = SchemaLocator::new(schema);
    let Some(root) = locator.locate("") else {
        return Vec::new();
    };

    property_names(&root.schema)
        .into_iter()
        .filter_map(|name| {
            let field = locator.locate(&name)?;
            let mut config = field.to_config(&name);
            if config.label.is_empty() {
                config.label = name.clone();
            }
            config.registry = registry.clone();
            config.form_props = Some(form_props.clone());
            config.on_change = Some(Arc::new(move |value: Option<Value>| {
                log::debug!("Field '{}' changed to {:?}", name, value);
            }));
            if let Some(customize) = customize {
                customize(&mut config);
            }
            Some(config)
        })
        .collect()
}

#[component]
pub fn SchemaForm(
    schema: Value,
    data: RwSignal<Value>,
    #[prop(optional)] registry: Option<ComponentRegistry>,
    #[prop(optional)] form_props: Option<FormProps>,
    #[prop(optional)] customize: Option<FieldCustomizer>,
) -> impl IntoView {
    provide_context(FormContext {
        store: SignalFormData::new(data),
    });

    let registry = registry.unwrap_or_else(builtin_registry);
    let form_props = form_props.unwrap_or_default();
    let layout = match form_props.label_position.unwrap_or_default() {
        LabelPosition::Top => "flex flex-col",
        LabelPosition::Left | LabelPosition::Right => "grid grid-cols-1 gap-2",
    };

    let fields = field_configs(&schema, &registry, &form_props, customize.as_ref());
    view! {
        <form class=format!("genForm {}", layout) on:submit=|ev| ev.prevent_default()>
            {fields.into_iter().map(|config| view! { <Field config=config /> }).collect_view()}
        </form>
    }
}
