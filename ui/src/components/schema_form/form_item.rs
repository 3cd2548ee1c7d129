//! Form Item and Popover
//!
//! Host components for the frame around each field: the labelled form item
//! that runs the field's rules on their trigger (focus leaving the item, or a
//! committed change inside it), and the hover popover carrying long
//! descriptions.

use leptos::prelude::*;
use schemaform::domain::vnode::{style_string, SlotProps, VNode};
use schemaform::schema_form::{Trigger, ValidationCallback, ROOT_PROP};
use std::sync::Arc;

use super::renderer::{attr_str, render_children, render_slot};
use super::store::{FieldState, FormContext};

// ============================================================================
// Form Item
// ============================================================================

#[component]
pub fn FormItem(node: VNode) -> impl IntoView {
    let class = format!("mb-4 {}", node.class_string());
    let style = style_string(&node.style);
    let prop = attr_str(&node.attrs, "prop");
    let label_style = attr_str(&node.attrs, "labelWidth").map(|w| format!("width: {}", w));

    let error = use_context::<FieldState>().unwrap_or_default().error;
    let form = use_context::<FormContext>();
    let rules = node.rules;
    let mut slots = node.slots;
    let label = slots.remove("label");
    let content = slots.remove("default");
    let error_slot = slots.remove("error");

    let run_rules = Arc::new(move |trigger: Trigger| {
        // Root rules substitute the whole tree themselves
        let value = match (&form, prop.as_deref()) {
            (Some(form), Some(prop)) if prop != ROOT_PROP => form.store.peek(prop),
            _ => None,
        };

        for rule in rules.iter().filter(|rule| rule.trigger == trigger) {
            rule.validate(
                value.clone(),
                ValidationCallback::new(move |outcome| {
                    if let Err(err) = &outcome {
                        if err.is_fault() {
                            log::error!("Field validation failed to run: {}", err);
                        }
                    }
                    error.set(outcome.err().map(|err| err.to_string()));
                }),
            );
        }
    });
    let on_blur = Arc::clone(&run_rules);

    view! {
        <div
            class=class
            style=style
            on:focusout=move |_| on_blur(Trigger::Blur)
            on:change=move |_| run_rules(Trigger::Change)
        >
            {label.map(|slot| view! {
                <label class="block text-sm font-medium text-gray-700 mb-1" style=label_style>
                    {render_slot(Some(&slot))}
                </label>
            })}
            <div class="flex-1">
                {render_slot(content.as_ref())}
                {move || {
                    let props = SlotProps { error: error.get() };
                    error_slot
                        .as_ref()
                        .map(|slot| render_children(slot.render(&props)))
                }}
            </div>
        </div>
    }
}

// ============================================================================
// Popover
// ============================================================================

#[component]
pub fn Popover(node: VNode) -> impl IntoView {
    let class = format!("relative inline-block {}", node.class_string());
    let style = style_string(&node.style);
    let placement = attr_str(&node.attrs, "placement").unwrap_or_else(|| "top".to_string());
    let click_trigger = attr_str(&node.attrs, "trigger").as_deref() == Some("click");

    let open = RwSignal::new(false);
    let mut slots = node.slots;
    let reference = slots.remove("reference");
    let content = slots.remove("default");

    view! {
        <span
            class=class
            style=style
            on:mouseenter=move |_| if !click_trigger { open.set(true) }
            on:mouseleave=move |_| if !click_trigger { open.set(false) }
            on:click=move |_| if click_trigger { open.update(|o| *o = !*o) }
        >
            {render_slot(reference.as_ref())}
            <div
                class=format!(
                    "absolute z-10 w-64 p-2 text-xs bg-white border border-gray-200 rounded shadow popover-{}",
                    placement
                )
                style:display=move || if open.get() { "block" } else { "none" }
            >
                {render_slot(content.as_ref())}
            </div>
        </span>
    }
}
