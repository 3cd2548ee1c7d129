use leptos::prelude::*;
use schemaform::domain::{FormProps, LabelPosition, WidgetConfig};
use schemaform::schema_form::{CustomRuleContext, InstanceHandle};
use serde_json::{json, Value};
use std::sync::Arc;

pub mod components;

use components::schema_form::{FieldCustomizer, SchemaForm, WidgetInstance};

fn demo_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "plan"],
        "properties": {
            "name": {
                "type": "string",
                "title": "Name",
                "description": "Shown on <b>invoices</b>",
                "minLength": 2
            },
            "email": { "type": "string", "title": "Email", "format": "email" },
            "plan": {
                "type": "string",
                "title": "Plan",
                "enum": ["free", "pro", "team"],
                "enumNames": ["Free", "Pro", "Team"]
            },
            "seats": { "type": "integer", "title": "Seats", "minimum": 1, "maximum": 50 },
            "features": {
                "type": "array",
                "title": "Features",
                "items": { "type": "string", "enum": ["sso", "audit", "export"] }
            }
        }
    })
}

#[component]
pub fn App() -> impl IntoView {
    let data = RwSignal::new(json!({}));
    let label_position = RwSignal::new(LabelPosition::Left);
    let customize: FieldCustomizer = Arc::new(|config: &mut WidgetConfig| {
        if config.cur_node_path == "name" {
            config.custom_rule = Some(Arc::new(reserved_name_rule));
        }
        config.get_widget = Some(Arc::new(log_widget_instance));
    });

    view! {
        <div class="min-h-screen bg-gray-100 p-8">
            <div class="max-w-5xl mx-auto grid grid-cols-2 gap-8">
                <div class="bg-white rounded-lg shadow p-6">
                    <div class="flex items-center justify-between mb-6">
                        <h1 class="text-2xl font-bold">"Schema Form"</h1>
                        <select
                            class="px-2 py-1 text-sm border border-gray-300 rounded"
                            on:change=move |ev| {
                                let position = match event_target_value(&ev).as_str() {
                                    "left" => LabelPosition::Left,
                                    "right" => LabelPosition::Right,
                                    _ => LabelPosition::Top,
                                };
                                label_position.set(position);
                            }
                        >
                            <option value="left" selected=true>"Label left"</option>
                            <option value="right">"Label right"</option>
                            <option value="top">"Label top"</option>
                        </select>
                    </div>
                    {move || {
                        let form_props = FormProps {
                            label_position: Some(label_position.get()),
                            label_suffix: Some(":".to_string()),
                        };
                        view! {
                            <SchemaForm
                                schema=demo_schema()
                                data=data
                                form_props=form_props
                                customize=customize.clone()
                            />
                        }
                    }}
                </div>
                <div class="bg-white rounded-lg shadow p-6">
                    <h2 class="text-lg font-semibold mb-4">"Form data"</h2>
                    <pre class="text-sm font-mono bg-gray-50 p-4 rounded">
                        {move || serde_json::to_string_pretty(&data.get()).unwrap_or_default()}
                    </pre>
                </div>
            </div>
        </div>
    }
}

/// Rejects reserved names once the schema accepts the value
fn reserved_name_rule(ctx: CustomRuleContext) {
    let reserved = ctx
        .value
        .as_ref()
        .and_then(|v| v.as_str())
        .is_some_and(|name| name.eq_ignore_ascii_case("admin"));
    ctx.callback
        .respond(reserved.then(|| "This name is reserved".to_string()));
}

fn log_widget_instance(handle: &InstanceHandle) {
    if let Some(instance) = handle.downcast_ref::<WidgetInstance>() {
        log::debug!("Mounted {} #{}", instance.component, instance.mount_id);
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(App);
}
