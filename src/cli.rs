use clap::Parser;
use std::path::PathBuf;

use crate::domain::LabelPosition;

/// Schema form field preview - renders one field of a JSON Schema form
#[derive(Parser, Debug, Clone)]
#[command(name = "schemaform", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SCHEMAFORM_CONFIG", default_value = "schemaform.toml")]
    pub config: PathBuf,

    /// JSON or YAML schema of the whole form
    #[arg(short, long, env = "SCHEMAFORM_SCHEMA")]
    pub schema: PathBuf,

    /// JSON or YAML form data (defaults to an empty object)
    #[arg(short, long, env = "SCHEMAFORM_DATA")]
    pub data: Option<PathBuf>,

    /// Node path of the field to render (empty for the root)
    #[arg(short, long, default_value = "")]
    pub path: String,

    /// Widget name; derived from the field schema when omitted
    #[arg(short, long)]
    pub widget: Option<String>,

    /// Field label; defaults to the schema title
    #[arg(long)]
    pub label: Option<String>,

    /// Field description; defaults to the schema description
    #[arg(long)]
    pub description: Option<String>,

    /// Mark the field as required
    #[arg(long)]
    pub required: bool,

    /// Label position of the form
    #[arg(long, value_enum, env = "SCHEMAFORM_LABEL_POSITION")]
    pub label_position: Option<LabelPosition>,

    /// Run the field's validation rule and print the outcome
    #[arg(long)]
    pub validate: bool,

    /// Re-render whenever the schema, data or config file changes
    #[arg(long)]
    pub watch: bool,
}

impl Cli {
    /// Files whose changes affect the preview
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.schema.clone(), self.config.clone()];
        paths.extend(self.data.clone());
        paths
    }
}
