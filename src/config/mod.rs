use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub mod validator;
#[cfg(feature = "cli")]
pub mod watcher;

#[cfg(feature = "cli")]
use crate::cli::Cli;
use crate::domain::{FormProps, LabelPosition};
use crate::error::{Result as FormResult, SchemaFormError};
use crate::schema_form::registry::{ComponentHandle, ComponentRegistry, FORM_ITEM, POPOVER, QUESTION_ICON};

/// Form engine settings
///
/// Loaded from an optional `schemaform.toml` and `SCHEMAFORM_*` environment
/// variables (`SCHEMAFORM_COMPONENTS__FORM_ITEM=my-item`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSettings {
    #[serde(default)]
    pub components: ComponentSettings,
    #[serde(default)]
    pub icons: IconSettings,
    #[serde(default)]
    pub form: FormSection,
    /// Widget name -> component the host registers for it
    #[serde(default = "default_widgets")]
    pub widgets: BTreeMap<String, String>,
}

/// Container components the renderer asks for
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComponentSettings {
    #[serde(default = "default_form_item")]
    pub form_item: String,
    #[serde(default = "default_popover")]
    pub popover: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IconSettings {
    /// CSS class of the description anchor icon
    #[serde(default = "default_question_icon")]
    pub question: String,
}

/// Form-wide presentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormSection {
    #[serde(default)]
    pub label_position: LabelPosition,
    #[serde(default)]
    pub label_suffix: String,
}

fn default_form_item() -> String {
    "form-item".to_string()
}

fn default_popover() -> String {
    "popover".to_string()
}

fn default_question_icon() -> String {
    "icon-question".to_string()
}

fn default_widgets() -> BTreeMap<String, String> {
    [
        ("input", "input"),
        ("number", "number-input"),
        ("select", "select"),
        ("checkbox-group", "checkbox-group"),
    ]
    .into_iter()
    .map(|(name, component)| (name.to_string(), component.to_string()))
    .collect()
}

impl Default for ComponentSettings {
    fn default() -> Self {
        Self {
            form_item: default_form_item(),
            popover: default_popover(),
        }
    }
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            question: default_question_icon(),
        }
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            components: ComponentSettings::default(),
            icons: IconSettings::default(),
            form: FormSection::default(),
            widgets: default_widgets(),
        }
    }
}

impl FormSettings {
    /// Create settings from CLI arguments (config file, env, then CLI overrides)
    #[cfg(feature = "cli")]
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        Self::check(&settings)?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path)?;
        Self::check(&settings)?;
        Ok(settings)
    }

    fn load(path: &Path) -> FormResult<Self> {
        let s = Config::builder()
            .set_default("components.form_item", default_form_item())?
            .set_default("components.popover", default_popover())?
            .set_default("icons.question", default_question_icon())?
            .set_default("form.label_position", "top")?
            .set_default("form.label_suffix", "")?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("SCHEMAFORM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn check(settings: &FormSettings) -> Result<(), anyhow::Error> {
        validator::SettingsValidator::validate(settings).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    #[cfg(feature = "cli")]
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(position) = cli.label_position {
            self.form.label_position = position;
        }
    }

    /// Registry handed to the renderer
    pub fn registry(&self) -> ComponentRegistry {
        let mut registry = ComponentRegistry::empty()
            .with_component(FORM_ITEM, ComponentHandle::new(&self.components.form_item))
            .with_component(POPOVER, ComponentHandle::new(&self.components.popover))
            .with_icon(QUESTION_ICON, &self.icons.question);
        for (name, component) in &self.widgets {
            registry.register(name, ComponentHandle::new(component));
        }
        registry
    }

    pub fn form_props(&self) -> FormProps {
        FormProps {
            label_position: Some(self.form.label_position),
            label_suffix: Some(self.form.label_suffix.clone()).filter(|s| !s.is_empty()),
        }
    }
}

/// Read a JSON or YAML document; the format follows the file extension
pub fn load_document(path: &Path) -> FormResult<Value> {
    let content = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("json") | None => Ok(serde_json::from_str(&content)?),
        Some(other) => Err(SchemaFormError::Settings(format!(
            "Unsupported document format '{}' for {}",
            other,
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_registry() {
        let registry = FormSettings::default().registry();
        assert_eq!(registry.component(FORM_ITEM).map(|h| h.as_str()), Some("form-item"));
        assert_eq!(registry.component("number").map(|h| h.as_str()), Some("number-input"));
        assert_eq!(registry.icon(QUESTION_ICON), Some("icon-question"));
    }

    #[test]
    fn test_form_props() {
        let mut settings = FormSettings::default();
        assert_eq!(
            settings.form_props(),
            FormProps {
                label_position: Some(LabelPosition::Top),
                label_suffix: None,
            }
        );

        settings.form.label_position = LabelPosition::Left;
        settings.form.label_suffix = "：".to_string();
        let props = settings.form_props();
        assert_eq!(props.label_position, Some(LabelPosition::Left));
        assert_eq!(props.label_suffix.as_deref(), Some("："));
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: FormSettings = serde_json::from_value(json!({
            "components": { "popover": "tooltip" },
            "form": { "label_position": "right" }
        }))
        .unwrap();
        assert_eq!(settings.components.form_item, "form-item");
        assert_eq!(settings.components.popover, "tooltip");
        assert_eq!(settings.form.label_position, LabelPosition::Right);
        assert!(settings.widgets.contains_key("select"));
    }
}
