//! One-field preview behind the `schemaform` binary
//!
//! Loads a form schema and data document, builds the config of the field at
//! the requested path the way a form generator would, renders it, and
//! optionally runs its validation rule.

use anyhow::{anyhow, Context};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::mpsc;
use std::sync::Arc;
use tracing::info;

use crate::cli::Cli;
use crate::config::{load_document, FormSettings};
use crate::domain::WidgetConfig;
use crate::schema_form::{
    FieldSchema, FormDataStore, SchemaLocator, SharedFormData, ValidationCallback, Widget, WidgetRef,
};

#[derive(Debug, Serialize)]
pub struct PreviewReport {
    /// Rendered node tree
    pub tree: Value,
    /// Form data after field construction (enum defaults applied)
    pub form_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl PreviewReport {
    /// Whether validation hit an integration fault
    pub fn has_fault(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.fault)
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub fault: bool,
    /// The rule did not answer synchronously
    pub pending: bool,
}

/// Render the field selected by `cli`
pub fn preview(cli: &Cli, settings: &FormSettings) -> Result<PreviewReport, anyhow::Error> {
    let schema = load_document(&cli.schema)
        .with_context(|| format!("Failed to load schema {}", cli.schema.display()))?;
    let data = match &cli.data {
        Some(path) => load_document(path)
            .with_context(|| format!("Failed to load form data {}", path.display()))?,
        None => json!({}),
    };

    let field = SchemaLocator::new(&schema)
        .locate(&cli.path)
        .ok_or_else(|| anyhow!("No schema found for path '{}'", cli.path))?;
    let config = field_config(cli, settings, &field);

    let store = SharedFormData::new(data);
    let widget = Widget::new(&config, Arc::new(store.clone()))?;
    info!(path = %cli.path, widget = ?config.widget, "Rendering field");

    let tree = widget.render(&config).to_json();
    let validation = cli.validate.then(|| run_validation(&widget, &config, &store));

    Ok(PreviewReport {
        tree,
        form_data: store.snapshot(),
        validation,
    })
}

/// Config of the previewed field; CLI flags win over schema-derived values
pub fn field_config(cli: &Cli, settings: &FormSettings, field: &FieldSchema) -> WidgetConfig {
    let mut config = field.to_config(&cli.path);
    config.required |= cli.required;
    if let Some(label) = &cli.label {
        config.label = label.clone();
    }
    if let Some(description) = &cli.description {
        config.description = description.clone();
    }
    if let Some(widget) = cli.widget.as_deref() {
        config.widget = Some(WidgetRef::from(widget));
    }
    config.form_props = Some(settings.form_props());
    config.registry = settings.registry();
    config
}

fn run_validation(widget: &Widget, config: &WidgetConfig, store: &SharedFormData) -> ValidationReport {
    let Some(rule) = widget.validation_rule(config) else {
        return ValidationReport {
            valid: true,
            ..Default::default()
        };
    };

    let (tx, rx) = mpsc::channel();
    rule.validate(
        store.get(&config.cur_node_path),
        ValidationCallback::new(move |outcome| {
            let _ = tx.send(outcome);
        }),
    );

    match rx.try_recv() {
        Ok(Ok(())) => ValidationReport {
            valid: true,
            ..Default::default()
        },
        Ok(Err(err)) => ValidationReport {
            valid: false,
            fault: err.is_fault(),
            error: Some(err.to_string()),
            pending: false,
        },
        Err(_) => ValidationReport {
            pending: true,
            ..Default::default()
        },
    }
}
