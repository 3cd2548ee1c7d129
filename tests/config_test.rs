use schemaform::config::{load_document, FormSettings};
use schemaform::domain::LabelPosition;
use schemaform::schema_form::registry::{FORM_ITEM, POPOVER, QUESTION_ICON};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_settings_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schemaform.toml");

    let settings_toml = r#"
[components]
form_item = "el-form-item"
popover = "el-popover"

[icons]
question = "el-icon-question"

[form]
label_position = "left"
label_suffix = ":"

[widgets]
input = "el-input"
date = "el-date-picker"
"#;
    fs::write(&path, settings_toml)?;

    let settings = FormSettings::from_path(&path)?;
    assert_eq!(settings.components.form_item, "el-form-item");
    assert_eq!(settings.form.label_position, LabelPosition::Left);

    let registry = settings.registry();
    assert_eq!(registry.component(FORM_ITEM).map(|h| h.as_str()), Some("el-form-item"));
    assert_eq!(registry.component(POPOVER).map(|h| h.as_str()), Some("el-popover"));
    assert_eq!(registry.component("date").map(|h| h.as_str()), Some("el-date-picker"));
    assert_eq!(registry.icon(QUESTION_ICON), Some("el-icon-question"));

    let props = settings.form_props();
    assert_eq!(props.label_position, Some(LabelPosition::Left));
    assert_eq!(props.label_suffix.as_deref(), Some(":"));

    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = FormSettings::from_path(&temp_dir.path().join("absent.toml"))?;

    assert_eq!(settings.components.form_item, "form-item");
    assert_eq!(settings.components.popover, "popover");
    assert_eq!(settings.icons.question, "icon-question");
    assert_eq!(settings.form.label_position, LabelPosition::Top);
    assert!(settings.form.label_suffix.is_empty());
    Ok(())
}

#[test]
fn test_invalid_settings_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("schemaform.toml");
    fs::write(&path, "[components]\nform_item = \"\"\n")?;

    let err = FormSettings::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("components.form_item"));
    Ok(())
}

#[test]
fn test_load_json_and_yaml_documents() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    fs::write(root.join("schema.json"), r#"{ "type": "string", "minLength": 2 }"#)?;
    fs::write(root.join("schema.yaml"), "type: string\nminLength: 2\n")?;

    let from_json = load_document(&root.join("schema.json"))?;
    let from_yaml = load_document(&root.join("schema.yaml"))?;
    assert_eq!(from_json, json!({ "type": "string", "minLength": 2 }));
    assert_eq!(from_json, from_yaml);

    fs::write(root.join("schema.txt"), "type: string")?;
    assert!(load_document(&root.join("schema.txt")).is_err());
    Ok(())
}
