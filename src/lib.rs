//! # Schemaform - Schema Form Field Engine
//!
//! Schemaform renders the fields of a JSON Schema driven form. Each field binds
//! to a slice of a shared form data tree, seeds enumerable fields with sensible
//! defaults, validates itself against its schema, and composes a declarative
//! node tree a UI host turns into real views.
//!
//! ## Features
//!
//! - **Path access**: dotted and bracketed node paths into the form data tree
//! - **Two-way binding**: empty-value normalization and change notifications
//! - **Enum defaults**: required selects start on a valid value
//! - **Validation**: JSON Schema (draft 7) plus custom rules, one message per field
//! - **Rendering**: label, description popover or block, error line, widget
//! - **Configuration**: component names, icons and form props from file or env
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schemaform::domain::WidgetConfig;
//! use schemaform::schema_form::{SharedFormData, Widget, WidgetRef};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SharedFormData::new(json!({ "name": "" }));
//!     let config = WidgetConfig {
//!         cur_node_path: "name".to_string(),
//!         schema: json!({ "type": "string", "minLength": 2 }),
//!         label: "Name".to_string(),
//!         widget: Some(WidgetRef::from("input")),
//!         ..Default::default()
//!     };
//!
//!     let widget = Widget::new(&config, Arc::new(store))?;
//!     let tree = widget.render(&config);
//!     println!("{}", tree.to_json());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: field config and the virtual node tree
//! - **Schema form**: path access, binding, validation, rendering
//! - **Config**: settings loading and validation
//! - **Preview**: the one-field preview behind the binary

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
#[cfg(feature = "cli")]
pub mod preview;
pub mod schema_form;

pub use error::{Result, SchemaFormError};
