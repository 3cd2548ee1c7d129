//! Node Tree Renderer
//!
//! Turns the engine's node tree into Leptos views. Plain elements map onto
//! their HTML tags; component nodes are looked up by handle among the
//! built-in components of this host.

use leptos::prelude::*;
use schemaform::domain::vnode::{style_string, Child, NodeTag, Slot, SlotProps, VNode};
use schemaform::domain::Attrs;
use schemaform::schema_form::{ComponentHandle, ComponentRegistry};

use super::form_item::{FormItem, Popover};
use super::widgets::{CheckboxGroup, NumberInput, SelectInput, TextInput};

/// Component handles this host knows how to mount
pub const BUILTIN_COMPONENTS: &[&str] = &[
    "form-item",
    "popover",
    "input",
    "number-input",
    "select",
    "checkbox-group",
];

/// Registry wiring every logical widget name to a built-in component
pub fn builtin_registry() -> ComponentRegistry {
    ComponentRegistry::default()
        .with_component("input", ComponentHandle::new("input"))
        .with_component("number", ComponentHandle::new("number-input"))
        .with_component("select", ComponentHandle::new("select"))
        .with_component("checkbox-group", ComponentHandle::new("checkbox-group"))
}

/// Render one node and its subtree
pub fn render_node(node: VNode) -> AnyView {
    let handle = match &node.tag {
        NodeTag::Element(_) => return render_element(node),
        NodeTag::Component(handle) => handle.as_str().to_string(),
    };

    match handle.as_str() {
        "form-item" => view! { <FormItem node=node /> }.into_any(),
        "popover" => view! { <Popover node=node /> }.into_any(),
        "input" => view! { <TextInput node=node /> }.into_any(),
        "number-input" => view! { <NumberInput node=node /> }.into_any(),
        "select" => view! { <SelectInput node=node /> }.into_any(),
        "checkbox-group" => view! { <CheckboxGroup node=node /> }.into_any(),
        other => {
            log::warn!("No component mounted for handle '{}'", other);
            ().into_any()
        }
    }
}

pub fn render_children(children: Vec<Child>) -> AnyView {
    children
        .into_iter()
        .map(|child| match child {
            Child::Node(node) => render_node(node),
            Child::Text(text) => text.into_any(),
        })
        .collect_view()
        .into_any()
}

/// Render a static slot, or a scoped slot with default props
pub fn render_slot(slot: Option<&Slot>) -> Option<AnyView> {
    slot.map(|slot| render_children(slot.render(&SlotProps::default())))
}

/// String attribute, if present
pub fn attr_str(attrs: &Attrs, name: &str) -> Option<String> {
    attrs.get(name).and_then(|v| v.as_str()).map(String::from)
}

fn render_element(node: VNode) -> AnyView {
    let tag = node.tag.name().to_string();
    let class = node.class_string();
    let style = style_string(&node.style);
    let title = attr_str(&node.attrs, "title");

    // Markup content replaces the children
    if let Some(html) = node.inner_html {
        return match tag.as_str() {
            "p" => view! { <p class=class style=style title=title inner_html=html></p> }.into_any(),
            "span" => {
                view! { <span class=class style=style title=title inner_html=html></span> }.into_any()
            }
            _ => view! { <div class=class style=style title=title inner_html=html></div> }.into_any(),
        };
    }

    let children = render_children(node.children);
    match tag.as_str() {
        "p" => view! { <p class=class style=style title=title>{children}</p> }.into_any(),
        "span" => view! { <span class=class style=style title=title>{children}</span> }.into_any(),
        "i" => view! { <i class=class style=style title=title>{children}</i> }.into_any(),
        "label" => view! { <label class=class style=style title=title>{children}</label> }.into_any(),
        "div" => view! { <div class=class style=style title=title>{children}</div> }.into_any(),
        other => {
            log::debug!("Rendering unknown element '{}' as div", other);
            view! { <div class=class style=style title=title>{children}</div> }.into_any()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attr_str() {
        let mut attrs = Attrs::new();
        attrs.insert("placement".to_string(), json!("top"));
        attrs.insert("labelWidth".to_string(), json!(120));

        assert_eq!(attr_str(&attrs, "placement").as_deref(), Some("top"));
        assert_eq!(attr_str(&attrs, "labelWidth"), None);
        assert_eq!(attr_str(&attrs, "missing"), None);
    }

    #[test]
    fn test_builtin_registry_resolves_to_mounted_components() {
        let registry = builtin_registry();
        for name in ["form_item", "popover", "input", "number", "select", "checkbox-group"] {
            let handle = registry.component(name).map(|h| h.as_str().to_string());
            assert!(
                handle.is_some_and(|h| BUILTIN_COMPONENTS.contains(&h.as_str())),
                "{} is not mounted",
                name
            );
        }
    }
}
