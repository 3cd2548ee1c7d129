use thiserror::Error;

use crate::config::{ComponentSettings, FormSettings};
use crate::schema_form::registry::{FORM_ITEM, POPOVER};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct SettingsValidator;

impl SettingsValidator {
    pub fn validate(settings: &FormSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_components(&settings.components) {
            errors.extend(e);
        }

        if settings.icons.question.trim().is_empty() {
            errors.push(SettingsError::MissingField("icons.question".to_string()));
        }

        if let Err(e) = Self::validate_widgets(settings) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_components(components: &ComponentSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        if components.form_item.trim().is_empty() {
            errors.push(SettingsError::MissingField("components.form_item".to_string()));
        }

        if components.popover.trim().is_empty() {
            errors.push(SettingsError::MissingField("components.popover".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_widgets(settings: &FormSettings) -> Result<(), Vec<SettingsError>> {
        let mut errors = Vec::new();

        for (name, component) in &settings.widgets {
            // Widgets share the registry with the container components
            if name == FORM_ITEM || name == POPOVER {
                errors.push(SettingsError::Duplicate(format!(
                    "Widget name '{}' is reserved for a container component",
                    name
                )));
            }

            if name.trim().is_empty() {
                errors.push(SettingsError::InvalidValue {
                    field: "widgets".to_string(),
                    reason: "Widget names must not be empty".to_string(),
                });
            }

            if component.trim().is_empty() {
                errors.push(SettingsError::MissingField(format!("widgets.{}", name)));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let result = SettingsValidator::validate(&FormSettings::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_components() {
        let mut settings = FormSettings::default();
        settings.components.form_item = String::new();
        settings.components.popover = " ".to_string();
        settings.icons.question = String::new();

        let errors = SettingsValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_reserved_widget_name() {
        let mut settings = FormSettings::default();
        settings.widgets.insert(FORM_ITEM.to_string(), "my-item".to_string());

        let errors = SettingsValidator::validate(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SettingsError::Duplicate(_)));
    }

    #[test]
    fn test_empty_widget_component() {
        let mut settings = FormSettings::default();
        settings.widgets.insert("date".to_string(), String::new());

        let errors = SettingsValidator::validate(&settings).unwrap_err();
        assert!(matches!(&errors[0], SettingsError::MissingField(f) if f == "widgets.date"));
    }
}
