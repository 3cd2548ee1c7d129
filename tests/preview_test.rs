use clap::Parser;
use schemaform::cli::Cli;
use schemaform::config::FormSettings;
use schemaform::preview::preview;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fixtures(root: &Path) -> anyhow::Result<()> {
    let schema = json!({
        "type": "object",
        "required": ["plan"],
        "properties": {
            "plan": {
                "type": "string",
                "title": "Plan",
                "description": "Billing plan",
                "enum": ["free", "pro"],
                "enumNames": ["Free", "Pro"]
            },
            "email": { "type": "string", "format": "email", "title": "Email" }
        }
    });
    fs::write(root.join("schema.json"), serde_json::to_string_pretty(&schema)?)?;
    fs::write(root.join("data.yaml"), "email: not-an-email\n")?;
    Ok(())
}

fn cli(root: &Path, extra: &[&str]) -> Cli {
    let config = root.join("schemaform.toml");
    let schema = root.join("schema.json");
    let data = root.join("data.yaml");
    let mut args = vec![
        "schemaform".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--schema".to_string(),
        schema.display().to_string(),
        "--data".to_string(),
        data.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::parse_from(args)
}

#[test]
fn test_preview_select_with_enum_default() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path())?;

    let cli = cli(temp_dir.path(), &["--path", "plan", "--label-position", "left"]);
    let settings = FormSettings::new_with_cli(&cli)?;
    let report = preview(&cli, &settings)?;

    // Required single select starts on its first option
    assert_eq!(report.form_data["plan"], json!("free"));

    let tree = &report.tree;
    assert_eq!(tree["component"], json!("form-item"));
    assert_eq!(tree["attrs"]["prop"], json!("plan"));
    assert_eq!(tree["rules"], json!([{ "trigger": "blur" }]));

    let label = &tree["slots"]["label"][0];
    assert_eq!(label["class"], json!("genFormItemRequired genFormLabel"));
    assert_eq!(label["children"][0], json!("Plan"));
    assert_eq!(label["children"][1]["component"], json!("popover"));

    let select = &tree["slots"]["default"][0];
    assert_eq!(select["component"], json!("select"));
    assert_eq!(select["modelValue"], json!("free"));
    assert_eq!(select["attrs"]["enumOptions"][1], json!({ "label": "Pro", "value": "pro" }));
    assert!(report.validation.is_none());
    Ok(())
}

#[test]
fn test_preview_validation_report() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path())?;

    let cli = cli(temp_dir.path(), &["--path", "email", "--validate"]);
    let settings = FormSettings::new_with_cli(&cli)?;
    let report = preview(&cli, &settings)?;

    let validation = report.validation.as_ref().unwrap();
    assert!(!validation.valid);
    assert!(!validation.fault);
    assert!(validation.error.is_some());
    assert!(!report.has_fault());

    // Top label position keeps the description out of the label
    assert_eq!(report.tree["component"], json!("form-item"));
    assert_eq!(report.tree["slots"]["default"][0]["component"], json!("input"));
    Ok(())
}

#[test]
fn test_preview_unknown_path() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    write_fixtures(temp_dir.path())?;

    let cli = cli(temp_dir.path(), &["--path", "missing.field"]);
    let settings = FormSettings::new_with_cli(&cli)?;
    let err = preview(&cli, &settings).unwrap_err();
    assert!(err.to_string().contains("missing.field"));
    Ok(())
}
