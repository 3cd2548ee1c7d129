//! Component registry
//!
//! Maps the logical names the renderer asks for to concrete component
//! handles the host knows how to build. The registry is an explicit value
//! handed to the renderer; there is no global lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Logical name of the field container
pub const FORM_ITEM: &str = "form_item";
/// Logical name of the hover popover
pub const POPOVER: &str = "popover";
/// Icon key of the description anchor
pub const QUESTION_ICON: &str = "question";

/// Opaque reference to a component the host can instantiate
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentHandle(String);

impl ComponentHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Widget as configured on a field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetRef {
    /// Name to look up in the registry
    ByName(String),
    /// Component supplied directly by the caller
    ByHandle(ComponentHandle),
}

impl From<&str> for WidgetRef {
    fn from(name: &str) -> Self {
        WidgetRef::ByName(name.to_string())
    }
}

impl From<ComponentHandle> for WidgetRef {
    fn from(handle: ComponentHandle) -> Self {
        WidgetRef::ByHandle(handle)
    }
}

/// Component and icon maps
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRegistry {
    #[serde(default)]
    components: BTreeMap<String, ComponentHandle>,
    #[serde(default)]
    icons: BTreeMap<String, String>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::empty()
            .with_component(FORM_ITEM, ComponentHandle::new("form-item"))
            .with_component(POPOVER, ComponentHandle::new("popover"))
            .with_icon(QUESTION_ICON, "icon-question")
    }
}

impl ComponentRegistry {
    /// Registry without any entries
    pub fn empty() -> Self {
        Self {
            components: BTreeMap::new(),
            icons: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, name: impl Into<String>, handle: ComponentHandle) -> Self {
        self.register(name, handle);
        self
    }

    pub fn with_icon(mut self, name: impl Into<String>, class: impl Into<String>) -> Self {
        self.icons.insert(name.into(), class.into());
        self
    }

    pub fn register(&mut self, name: impl Into<String>, handle: ComponentHandle) {
        self.components.insert(name.into(), handle);
    }

    /// Component registered under `name`
    pub fn component(&self, name: &str) -> Option<&ComponentHandle> {
        self.components.get(name)
    }

    /// Resolve a widget reference. Handles resolve to themselves.
    pub fn resolve(&self, widget: &WidgetRef) -> Option<ComponentHandle> {
        match widget {
            WidgetRef::ByName(name) => self.components.get(name).cloned(),
            WidgetRef::ByHandle(handle) => Some(handle.clone()),
        }
    }

    /// CSS class of the icon registered under `name`
    pub fn icon(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }
}
