//! Two-way value binding
//!
//! A field reads and writes its value through [`ValueBinding`]. Writes are the
//! only way this crate mutates the form data tree, and every successful write
//! emits exactly one change notification carrying the normalized value.

use serde_json::Value;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use super::path::{get_path_val, set_path_val};
use crate::domain::{ChangeHandler, WidgetConfig};
use crate::error::Result;

// ============================================================================
// Form Data Store
// ============================================================================

/// Shared, externally owned form data tree.
///
/// Hosts implement this over their own reactive primitive so that reads made
/// during a render pass are tracked.
pub trait FormDataStore: Send + Sync {
    /// Value at `path`, `None` when absent
    fn get(&self, path: &str) -> Option<Value>;

    /// Write `value` at `path`; writing the root is a no-op
    fn set(&self, path: &str, value: Option<Value>) -> Result<()>;

    /// Copy of the whole tree
    fn snapshot(&self) -> Value;
}

/// Plain shared tree without reactivity
#[derive(Clone, Debug, Default)]
pub struct SharedFormData(Arc<RwLock<Value>>);

impl SharedFormData {
    pub fn new(tree: Value) -> Self {
        Self(Arc::new(RwLock::new(tree)))
    }
}

impl FormDataStore for SharedFormData {
    fn get(&self, path: &str) -> Option<Value> {
        let tree = self.0.read().unwrap_or_else(PoisonError::into_inner);
        get_path_val(&tree, path).cloned()
    }

    fn set(&self, path: &str, value: Option<Value>) -> Result<()> {
        let mut tree = self.0.write().unwrap_or_else(PoisonError::into_inner);
        set_path_val(&mut tree, path, value)
    }

    fn snapshot(&self) -> Value {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

// ============================================================================
// Value Binding
// ============================================================================

/// Where a field's value lives
#[derive(Clone)]
pub enum BindingSource {
    /// Slice of the shared tree at `path`
    FormData {
        store: Arc<dyn FormDataStore>,
        path: String,
    },
    /// Value owned by the caller (e.g. the variant picker of a oneOf field)
    Local(Option<Value>),
}

impl fmt::Debug for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSource::FormData { path, .. } => {
                f.debug_struct("FormData").field("path", path).finish_non_exhaustive()
            }
            BindingSource::Local(value) => f.debug_tuple("Local").field(value).finish(),
        }
    }
}

/// `""` and `null` coming from a widget become the configured empty value
pub fn normalize_empty(raw: Option<Value>, empty_value: &Option<Value>) -> Option<Value> {
    match raw {
        Some(Value::Null) => empty_value.clone(),
        Some(Value::String(s)) if s.is_empty() => empty_value.clone(),
        other => other,
    }
}

/// Read/write access to one field's value
#[derive(Clone)]
pub struct ValueBinding {
    source: BindingSource,
    empty_value: Option<Value>,
    on_change: Option<ChangeHandler>,
}

impl ValueBinding {
    pub fn new(
        source: BindingSource,
        empty_value: Option<Value>,
        on_change: Option<ChangeHandler>,
    ) -> Self {
        Self {
            source,
            empty_value,
            on_change,
        }
    }

    /// Bind according to `config.is_form_data`; the two sources never mix
    pub fn from_config(config: &WidgetConfig, store: Arc<dyn FormDataStore>) -> Self {
        let source = if config.is_form_data {
            BindingSource::FormData {
                store,
                path: config.cur_node_path.clone(),
            }
        } else {
            BindingSource::Local(config.cur_value.clone())
        };
        Self::new(source, config.empty_value.clone(), config.on_change.clone())
    }

    pub fn source(&self) -> &BindingSource {
        &self.source
    }

    pub fn read(&self) -> Option<Value> {
        match &self.source {
            BindingSource::FormData { store, path } => store.get(path),
            BindingSource::Local(value) => value.clone(),
        }
    }

    /// Normalize, write through to the tree when bound to it, then emit change.
    ///
    /// Returns the normalized value. Nothing is emitted when the tree write fails.
    pub fn write(&self, raw: Option<Value>) -> Result<Option<Value>> {
        let value = normalize_empty(raw, &self.empty_value);

        if let BindingSource::FormData { store, path } = &self.source {
            store.set(path, value.clone())?;
            debug!(path = %path, value = ?value, "Field value written");
        }

        if let Some(on_change) = &self.on_change {
            on_change(value.clone());
        }
        Ok(value)
    }
}

impl fmt::Debug for ValueBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueBinding")
            .field("source", &self.source)
            .field("empty_value", &self.empty_value)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recording() -> (ChangeHandler, Arc<Mutex<Vec<Option<Value>>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let handler: ChangeHandler = Arc::new(move |value| sink.lock().unwrap().push(value));
        (handler, events)
    }

    fn tree_binding(store: &SharedFormData, path: &str, empty: Option<Value>) -> ValueBinding {
        ValueBinding::new(
            BindingSource::FormData {
                store: Arc::new(store.clone()),
                path: path.to_string(),
            },
            empty,
            None,
        )
    }

    #[test]
    fn test_read_from_tree_and_local() {
        let store = SharedFormData::new(json!({ "user": { "name": "Ada" } }));
        let bound = tree_binding(&store, "user.name", None);
        assert_eq!(bound.read(), Some(json!("Ada")));

        let local = ValueBinding::new(BindingSource::Local(Some(json!(3))), None, None);
        assert_eq!(local.read(), Some(json!(3)));
    }

    #[test]
    fn test_empty_string_and_null_normalize() {
        let store = SharedFormData::new(json!({}));
        let bound = tree_binding(&store, "a", Some(json!("EMPTY")));

        assert_eq!(bound.write(Some(json!(""))).unwrap(), Some(json!("EMPTY")));
        assert_eq!(bound.write(Some(Value::Null)).unwrap(), Some(json!("EMPTY")));
        assert_eq!(store.get("a"), Some(json!("EMPTY")));
    }

    #[test]
    fn test_default_empty_value_is_undefined() {
        let store = SharedFormData::new(json!({ "a": "x" }));
        let bound = tree_binding(&store, "a", None);

        assert_eq!(bound.write(Some(json!(""))).unwrap(), None);
        assert_eq!(store.snapshot(), json!({}));
    }

    #[test]
    fn test_falsy_values_pass_through() {
        assert_eq!(normalize_empty(Some(json!(0)), &Some(json!("E"))), Some(json!(0)));
        assert_eq!(normalize_empty(Some(json!(false)), &Some(json!("E"))), Some(json!(false)));
        assert_eq!(normalize_empty(Some(json!([])), &Some(json!("E"))), Some(json!([])));
        assert_eq!(normalize_empty(None, &Some(json!("E"))), None);
    }

    #[test]
    fn test_local_write_emits_without_touching_tree() {
        let (handler, events) = recording();
        let local = ValueBinding::new(BindingSource::Local(None), None, Some(handler));

        local.write(Some(json!("picked"))).unwrap();
        local.write(Some(json!(""))).unwrap();

        let events = events.lock().unwrap();
        assert_eq!(*events, vec![Some(json!("picked")), None]);
        assert_eq!(local.read(), None);
    }

    #[test]
    fn test_failed_write_emits_nothing() {
        let (handler, events) = recording();
        let store = SharedFormData::new(json!({ "a": 1 }));
        let bound = ValueBinding::new(
            BindingSource::FormData {
                store: Arc::new(store.clone()),
                path: "a.b".to_string(),
            },
            None,
            Some(handler),
        );

        assert!(bound.write(Some(json!(2))).is_err());
        assert!(events.lock().unwrap().is_empty());
    }
}
