//! Virtual node tree
//!
//! The declarative UI-tree primitive the field renderer builds into. A host
//! (the Leptos `ui` crate, or the preview binary) walks the tree and turns it
//! into real views. Nodes are plain data plus a few shared callbacks:
//! - `model`: value-in / value-out wiring for input widgets
//! - `rules`: validation rules consumed by the form-item container
//! - `instance_ref`: relay notified once the widget's live instance exists

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::schema_form::registry::ComponentHandle;
use crate::schema_form::relay::InstanceHandleRelay;
use crate::schema_form::validation::ValidationRule;

/// Class name -> enabled flag
pub type ClassMap = BTreeMap<String, bool>;

/// CSS property name -> value
pub type StyleMap = BTreeMap<String, String>;

/// Plain (serializable) properties
pub type Attrs = Map<String, Value>;

// ============================================================================
// Tags and Children
// ============================================================================

/// What a node renders as
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeTag {
    /// Plain element such as `p`, `span` or `i`
    Element(String),
    /// Component resolved through the registry
    Component(ComponentHandle),
}

impl NodeTag {
    pub fn name(&self) -> &str {
        match self {
            NodeTag::Element(tag) => tag,
            NodeTag::Component(handle) => handle.as_str(),
        }
    }
}

/// Child of a node or content of a static slot
#[derive(Clone, Debug)]
pub enum Child {
    Node(VNode),
    Text(String),
}

/// Props handed to scoped slots by the host component
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlotProps {
    /// Current validation error of the enclosing form item
    pub error: Option<String>,
}

/// Slot rendered by the host with its own props
pub type ScopedSlot = Arc<dyn Fn(&SlotProps) -> Option<VNode> + Send + Sync>;

/// Named slot content
#[derive(Clone)]
pub enum Slot {
    Nodes(Vec<Child>),
    Scoped(ScopedSlot),
}

impl Slot {
    pub fn nodes(nodes: Vec<VNode>) -> Self {
        Slot::Nodes(nodes.into_iter().map(Child::Node).collect())
    }

    pub fn scoped<F>(render: F) -> Self
    where
        F: Fn(&SlotProps) -> Option<VNode> + Send + Sync + 'static,
    {
        Slot::Scoped(Arc::new(render))
    }

    /// Static children, `None` for scoped slots
    pub fn children(&self) -> Option<&[Child]> {
        match self {
            Slot::Nodes(children) => Some(children.as_slice()),
            Slot::Scoped(_) => None,
        }
    }

    /// Render the slot with the given props
    pub fn render(&self, props: &SlotProps) -> Vec<Child> {
        match self {
            Slot::Nodes(children) => children.clone(),
            Slot::Scoped(render) => render(props).map(Child::Node).into_iter().collect(),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Nodes(children) => f.debug_tuple("Nodes").field(children).finish(),
            Slot::Scoped(_) => f.write_str("Scoped(..)"),
        }
    }
}

// ============================================================================
// Model Binding
// ============================================================================

type UpdateFn = Arc<dyn Fn(Option<Value>) + Send + Sync>;

/// Value-in / value-out contract of an input widget
#[derive(Clone)]
pub struct ModelBinding {
    /// Current bound value (`None` = undefined)
    pub value: Option<Value>,
    on_update: UpdateFn,
}

impl ModelBinding {
    pub fn new<F>(value: Option<Value>, on_update: F) -> Self
    where
        F: Fn(Option<Value>) + Send + Sync + 'static,
    {
        Self {
            value,
            on_update: Arc::new(on_update),
        }
    }

    /// Called by the widget when the user changes its value
    pub fn update(&self, value: Option<Value>) {
        (self.on_update)(value)
    }
}

impl fmt::Debug for ModelBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelBinding")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// VNode
// ============================================================================

/// A node of the rendered field tree
#[derive(Clone, Debug)]
pub struct VNode {
    pub tag: NodeTag,
    pub class: ClassMap,
    pub style: StyleMap,
    pub attrs: Attrs,
    /// Raw HTML content (descriptions may carry markup)
    pub inner_html: Option<String>,
    pub children: Vec<Child>,
    pub slots: BTreeMap<String, Slot>,
    pub rules: Vec<ValidationRule>,
    pub model: Option<ModelBinding>,
    pub instance_ref: Option<Arc<InstanceHandleRelay>>,
}

/// Build a node for a tag; the rest is filled in with the builder methods
pub fn h(tag: NodeTag) -> VNode {
    VNode {
        tag,
        class: ClassMap::new(),
        style: StyleMap::new(),
        attrs: Attrs::new(),
        inner_html: None,
        children: Vec::new(),
        slots: BTreeMap::new(),
        rules: Vec::new(),
        model: None,
        instance_ref: None,
    }
}

impl VNode {
    pub fn element(tag: &str) -> Self {
        h(NodeTag::Element(tag.to_string()))
    }

    pub fn component(handle: ComponentHandle) -> Self {
        h(NodeTag::Component(handle))
    }

    pub fn class(mut self, name: &str) -> Self {
        self.class.insert(name.to_string(), true);
        self
    }

    pub fn class_if(mut self, name: &str, enabled: bool) -> Self {
        self.class.insert(name.to_string(), enabled);
        self
    }

    pub fn classes(mut self, classes: &ClassMap) -> Self {
        self.class
            .extend(classes.iter().map(|(k, v)| (k.clone(), *v)));
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn styles(mut self, styles: &StyleMap) -> Self {
        self.style
            .extend(styles.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn inner_html(mut self, html: &str) -> Self {
        self.inner_html = Some(html.to_string());
        self
    }

    pub fn child(mut self, node: VNode) -> Self {
        self.children.push(Child::Node(node));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Child::Text(text.to_string()));
        self
    }

    pub fn slot(mut self, name: &str, slot: Slot) -> Self {
        self.slots.insert(name.to_string(), slot);
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn model(mut self, model: ModelBinding) -> Self {
        self.model = Some(model);
        self
    }

    pub fn instance_ref(mut self, relay: Arc<InstanceHandleRelay>) -> Self {
        self.instance_ref = Some(relay);
        self
    }

    /// Enabled class names, space separated
    pub fn class_string(&self) -> String {
        class_string(&self.class)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class.get(name).copied().unwrap_or(false)
    }

    /// Depth-first search over children and static slots
    pub fn find(&self, pred: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if pred(self) {
            return Some(self);
        }
        self.child_nodes().find_map(|node| node.find(pred))
    }

    pub fn find_by_class(&self, name: &str) -> Option<&VNode> {
        self.find(&|node| node.has_class(name))
    }

    /// First node carrying a model binding (the embedded input widget)
    pub fn find_widget(&self) -> Option<&VNode> {
        self.find(&|node| node.model.is_some())
    }

    /// Concatenated text of this node, its children and static slots
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        if let Some(html) = &self.inner_html {
            out.push_str(html);
        }
        for child in self.children.iter().chain(self.static_slot_children()) {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Node(node) => out.push_str(&node.text_content()),
            }
        }
        out
    }

    fn static_slot_children(&self) -> impl Iterator<Item = &Child> {
        self.slots
            .values()
            .filter_map(Slot::children)
            .flatten()
    }

    fn child_nodes(&self) -> impl Iterator<Item = &VNode> {
        self.children
            .iter()
            .chain(self.static_slot_children())
            .filter_map(|child| match child {
                Child::Node(node) => Some(node),
                Child::Text(_) => None,
            })
    }

    /// Serializable view of the tree, used by the preview binary
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        let kind = match &self.tag {
            NodeTag::Element(_) => "element",
            NodeTag::Component(_) => "component",
        };
        obj.insert(kind.to_string(), Value::String(self.tag.name().to_string()));

        let class = self.class_string();
        if !class.is_empty() {
            obj.insert("class".to_string(), Value::String(class));
        }
        if !self.style.is_empty() {
            obj.insert("style".to_string(), Value::String(style_string(&self.style)));
        }
        if !self.attrs.is_empty() {
            obj.insert("attrs".to_string(), Value::Object(self.attrs.clone()));
        }
        if let Some(html) = &self.inner_html {
            obj.insert("innerHTML".to_string(), Value::String(html.clone()));
        }
        if !self.children.is_empty() {
            obj.insert("children".to_string(), children_to_json(&self.children));
        }
        if !self.slots.is_empty() {
            let slots: Map<String, Value> = self
                .slots
                .iter()
                .map(|(name, slot)| {
                    let content = match slot {
                        Slot::Nodes(children) => children_to_json(children),
                        Slot::Scoped(_) => Value::String("<scoped>".to_string()),
                    };
                    (name.clone(), content)
                })
                .collect();
            obj.insert("slots".to_string(), Value::Object(slots));
        }
        if !self.rules.is_empty() {
            let rules: Vec<Value> = self
                .rules
                .iter()
                .map(|rule| json!({ "trigger": rule.trigger }))
                .collect();
            obj.insert("rules".to_string(), Value::Array(rules));
        }
        if let Some(model) = &self.model {
            obj.insert(
                "modelValue".to_string(),
                model.value.clone().unwrap_or(Value::Null),
            );
        }
        if self.instance_ref.is_some() {
            obj.insert("ref".to_string(), Value::Bool(true));
        }
        Value::Object(obj)
    }
}

fn children_to_json(children: &[Child]) -> Value {
    Value::Array(
        children
            .iter()
            .map(|child| match child {
                Child::Node(node) => node.to_json(),
                Child::Text(text) => Value::String(text.clone()),
            })
            .collect(),
    )
}

/// Enabled class names, space separated
pub fn class_string(classes: &ClassMap) -> String {
    classes
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inline style declaration list: `a: b; c: d`
pub fn style_string(styles: &StyleMap) -> String {
    styles
        .iter()
        .map(|(property, value)| format!("{}: {}", property, value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_string_skips_disabled() {
        let node = VNode::element("span")
            .class("genFormLabel")
            .class_if("genFormItemRequired", false);
        assert_eq!(node.class_string(), "genFormLabel");
        assert!(!node.has_class("genFormItemRequired"));
    }

    #[test]
    fn test_text_content_includes_static_slots() {
        let node = VNode::element("div")
            .text("a")
            .slot("label", Slot::nodes(vec![VNode::element("span").text("b")]))
            .slot("error", Slot::scoped(|_| Some(VNode::element("p").text("hidden"))));
        assert_eq!(node.text_content(), "ab");
    }

    #[test]
    fn test_scoped_slot_render() {
        let slot = Slot::scoped(|props: &SlotProps| {
            props.error.as_ref().map(|e| VNode::element("p").text(e))
        });
        assert!(slot.render(&SlotProps::default()).is_empty());
        let rendered = slot.render(&SlotProps { error: Some("bad".to_string()) });
        assert_eq!(rendered.len(), 1);
    }

    #[test]
    fn test_to_json_shape() {
        let node = VNode::element("p")
            .class("genFromWidget_des")
            .style("margin", "0 2px")
            .inner_html("<b>hi</b>");
        let json = node.to_json();
        assert_eq!(json["element"], "p");
        assert_eq!(json["class"], "genFromWidget_des");
        assert_eq!(json["style"], "margin: 0 2px");
        assert_eq!(json["innerHTML"], "<b>hi</b>");
    }
}
