//! Reactive form data store
//!
//! The form data tree lives in one `RwSignal`; fields read and write their
//! slice of it through the engine's path helpers.

use leptos::prelude::*;
use schemaform::schema_form::{get_path_val, set_path_val, FormDataStore};
use serde_json::Value;

/// Form data tree held in a reactive signal
#[derive(Clone, Copy)]
pub struct SignalFormData {
    data: RwSignal<Value>,
}

impl SignalFormData {
    pub fn new(data: RwSignal<Value>) -> Self {
        Self { data }
    }

    /// Read without subscribing the running reactive scope
    pub fn peek(&self, path: &str) -> Option<Value> {
        self.data
            .with_untracked(|tree| get_path_val(tree, path).cloned())
    }
}

impl FormDataStore for SignalFormData {
    fn get(&self, path: &str) -> Option<Value> {
        self.data.with(|tree| get_path_val(tree, path).cloned())
    }

    fn set(&self, path: &str, value: Option<Value>) -> schemaform::Result<()> {
        let mut result = Ok(());
        self.data.update(|tree| result = set_path_val(tree, path, value));
        result
    }

    fn snapshot(&self) -> Value {
        self.data.get_untracked()
    }
}

/// Shared by every field of one form
#[derive(Clone, Copy)]
pub struct FormContext {
    pub store: SignalFormData,
}

/// Per-field state that outlives re-renders of the field's node tree
#[derive(Clone, Copy)]
pub struct FieldState {
    pub error: RwSignal<Option<String>>,
}

impl FieldState {
    pub fn new() -> Self {
        Self {
            error: RwSignal::new(None),
        }
    }
}

impl Default for FieldState {
    fn default() -> Self {
        Self::new()
    }
}
