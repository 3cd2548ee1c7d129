//! Schema Form Host
//!
//! Mounts the engine's field node trees as Leptos views:
//! - Reactive form data store shared by all fields of a form
//! - Form item, popover and input components addressed by handle
//! - Widget instance relay fired once an input is mounted

pub mod field;
pub mod form_item;
pub mod renderer;
pub mod store;
pub mod widgets;

pub use field::{field_configs, Field, FieldCustomizer, SchemaForm};
pub use renderer::{builtin_registry, render_node};
pub use store::{FieldState, FormContext, SignalFormData};
pub use widgets::WidgetInstance;
