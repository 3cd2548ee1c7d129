//! Field render composition
//!
//! Builds the node tree of one field from its config: the form-item
//! container with its label, error and default slots, the description in
//! either placement, and the embedded input widget. Composition is a pure
//! function of its inputs; it never reads or writes the form data itself.

use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use super::path::{is_root, to_validation_prop, ROOT_PROP};
use super::registry::{ComponentRegistry, FORM_ITEM, POPOVER, QUESTION_ICON};
use super::relay::InstanceHandleRelay;
use super::validation::ValidationRule;
use crate::domain::vnode::{Child, ModelBinding, Slot, VNode};
use crate::domain::{FormProps, LabelPosition, WidgetConfig};

/// Widget props owned by the binding and relay wiring
const RESERVED_WIDGET_PROPS: [&str; 3] = ["modelValue", "onUpdate:modelValue", "ref"];

/// Where the description goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptionMode {
    /// Block above the widget
    Full,
    /// Hover popover next to the label
    Mini,
}

impl DescriptionMode {
    /// Mini whenever a label position other than `top` is configured
    pub fn from_form_props(form_props: Option<&FormProps>) -> Self {
        match form_props.and_then(|props| props.label_position) {
            Some(position) if position != LabelPosition::Top => DescriptionMode::Mini,
            _ => DescriptionMode::Full,
        }
    }
}

pub struct RenderComposer<'a> {
    registry: &'a ComponentRegistry,
}

impl<'a> RenderComposer<'a> {
    pub fn new(registry: &'a ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Compose the field tree.
    ///
    /// `rule` is attached only to tree-bound fields; `relay` is wired to the
    /// widget so the host can report its instance.
    pub fn compose(
        &self,
        config: &WidgetConfig,
        model: ModelBinding,
        rule: Option<ValidationRule>,
        relay: Option<Arc<InstanceHandleRelay>>,
    ) -> VNode {
        let mode = DescriptionMode::from_form_props(config.form_props.as_ref());
        let description = description_node(&config.description);

        // Without a popover component the description falls back to a block
        let (popover, block_description) = match (mode, description) {
            (_, None) => (None, None),
            (DescriptionMode::Full, Some(desc)) => (None, Some(desc)),
            (DescriptionMode::Mini, Some(desc)) => match self.popover(desc.clone()) {
                Some(popover) => (Some(popover), None),
                None => (None, Some(desc)),
            },
        };

        let mut item = self.form_item(config);

        if config.is_form_data {
            let prop = if is_root(&config.cur_node_path) {
                ROOT_PROP.to_string()
            } else {
                to_validation_prop(&config.cur_node_path)
            };
            item = item.attr("prop", prop);
            if let Some(rule) = rule {
                item = item.rule(rule);
            }
        }

        item = item.slot("error", Slot::scoped(|props| error_node(props.error.as_deref())));

        if !config.label.is_empty() {
            item = item.slot("label", Slot::nodes(vec![label_node(config, popover)]));
        }

        let mut default = Vec::new();
        default.extend(block_description);
        default.extend(self.widget_node(config, model, relay));
        item.slot("default", Slot::nodes(default))
    }

    fn form_item(&self, config: &WidgetConfig) -> VNode {
        let mut item = match self.registry.component(FORM_ITEM) {
            Some(handle) => VNode::component(handle.clone()),
            None => {
                warn!(component = FORM_ITEM, "Component not registered, rendering plain container");
                VNode::element("div")
            }
        };

        item = item
            .classes(&config.field_class)
            .class("genFormItem")
            .styles(&config.field_style);
        if !config.width.is_empty() {
            item = item
                .style("width", &config.width)
                .style("flex-basis", &config.width)
                .style("padding-right", "10px");
        }

        item = item.attrs(config.field_attrs.clone());
        if !config.label_width.is_empty() {
            item = item.attr("labelWidth", config.label_width.clone());
        }
        item
    }

    fn popover(&self, description: VNode) -> Option<VNode> {
        let Some(handle) = self.registry.component(POPOVER) else {
            warn!(component = POPOVER, "Component not registered, showing description as block");
            return None;
        };

        let mut anchor = VNode::element("i");
        if let Some(icon) = self.registry.icon(QUESTION_ICON) {
            anchor = anchor.class(icon);
        }

        Some(
            VNode::component(handle.clone())
                .style("margin", "0 2px")
                .style("font-size", "16px")
                .style("cursor", "pointer")
                .attr("placement", "top")
                .attr("trigger", "hover")
                .slot("default", Slot::nodes(vec![description]))
                .slot("reference", Slot::nodes(vec![anchor])),
        )
    }

    fn widget_node(
        &self,
        config: &WidgetConfig,
        model: ModelBinding,
        relay: Option<Arc<InstanceHandleRelay>>,
    ) -> Option<VNode> {
        let widget = config.widget.as_ref()?;
        let Some(handle) = self.registry.resolve(widget) else {
            warn!(widget = ?widget, path = %config.cur_node_path, "Widget not registered, skipping input");
            return None;
        };

        let mut attrs = config.widget_attrs.clone();
        attrs.extend(config.ui_props.iter().map(|(k, v)| (k.clone(), v.clone())));
        for key in RESERVED_WIDGET_PROPS {
            attrs.remove(key);
        }

        let mut node = VNode::component(handle)
            .styles(&config.widget_style)
            .classes(&config.widget_class)
            .attrs(attrs)
            .model(model);
        if let Some(relay) = relay {
            node = node.instance_ref(relay);
        }
        Some(node)
    }
}

fn description_node(description: &str) -> Option<VNode> {
    if description.is_empty() {
        return None;
    }
    Some(
        VNode::element("p")
            .class("genFromWidget_des")
            .inner_html(description),
    )
}

/// One-line error box; the full message stays available as the title
fn error_node(error: Option<&str>) -> Option<VNode> {
    let error = error.filter(|e| !e.is_empty())?;
    Some(
        VNode::element("p")
            .class("formItemErrorBox")
            .attr("title", Value::String(error.to_string()))
            .text(error),
    )
}

fn label_node(config: &WidgetConfig, popover: Option<VNode>) -> VNode {
    let mut label = VNode::element("span")
        .class("genFormLabel")
        .class_if("genFormItemRequired", config.required)
        .text(&config.label);
    if let Some(popover) = popover {
        label = label.child(popover);
    }

    let suffix = config
        .form_props
        .as_ref()
        .and_then(|props| props.label_suffix.as_deref())
        .unwrap_or_default();
    if !suffix.is_empty() {
        label.children.push(Child::Text(suffix.to_string()));
    }
    label
}
