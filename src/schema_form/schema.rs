//! Field schema lookup
//!
//! Finds the sub-schema that governs a node path inside a form schema,
//! following local `$ref`s, and derives the per-field defaults a form
//! generator feeds into [`WidgetConfig`](crate::domain::WidgetConfig):
//! required-ness, label, description, widget name and enum options.

use serde_json::{json, Map, Value};

use super::path::{PathSegment, PropertyPath};
use super::registry::WidgetRef;
use crate::domain::{Attrs, WidgetConfig};

/// Maximum `$ref` hops followed for one lookup
const MAX_REF_DEPTH: usize = 20;

/// Sub-schema of one field
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    /// Resolved schema, carrying the root definitions so it validates standalone
    pub schema: Value,
    /// Listed in the parent's `required`
    pub required: bool,
}

impl FieldSchema {
    pub fn title(&self) -> Option<&str> {
        self.schema.get("title").and_then(|v| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.schema.get("description").and_then(|v| v.as_str())
    }

    /// Widget a plain form would use for this schema; `None` for containers
    pub fn default_widget(&self) -> Option<&'static str> {
        let schema = &self.schema;
        if schema.get("enum").is_some() {
            return Some("select");
        }
        match schema.get("type").and_then(|t| t.as_str()) {
            Some("array") => schema
                .get("items")
                .filter(|items| items.get("enum").is_some())
                .map(|_| "checkbox-group"),
            Some("number") | Some("integer") => Some("number"),
            Some("boolean") => Some("select"),
            Some("object") => None,
            _ => Some("input"),
        }
    }

    /// `enumOptions` for enumerable widgets, labelled with `enumNames` when given
    pub fn enum_options(&self) -> Option<Value> {
        let schema = &self.schema;
        let source = match schema.get("type").and_then(|t| t.as_str()) {
            Some("array") => schema.get("items")?,
            Some("boolean") if schema.get("enum").is_none() => {
                return Some(json!([
                    { "label": "true", "value": true },
                    { "label": "false", "value": false }
                ]));
            }
            _ => schema,
        };

        let values = source.get("enum")?.as_array()?;
        let names = source.get("enumNames").and_then(|v| v.as_array());
        let options = values
            .iter()
            .enumerate()
            .map(|(idx, value)| {
                let label = names
                    .and_then(|names| names.get(idx))
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .unwrap_or_else(|| match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    });
                json!({ "label": label, "value": value })
            })
            .collect();
        Some(Value::Array(options))
    }

    /// Config of the field at `path` derived from the schema alone
    pub fn to_config(&self, path: &str) -> WidgetConfig {
        let mut ui_props = Attrs::new();
        if let Some(options) = self.enum_options() {
            ui_props.insert("enumOptions".to_string(), options);
        }

        WidgetConfig {
            cur_node_path: path.to_string(),
            schema: self.schema.clone(),
            required: self.required,
            label: self.title().unwrap_or_default().to_string(),
            description: self.description().unwrap_or_default().to_string(),
            widget: self.default_widget().map(WidgetRef::from),
            ui_props,
            ..Default::default()
        }
    }
}

/// Looks up field schemas inside one form schema
pub struct SchemaLocator<'a> {
    root: &'a Value,
}

impl<'a> SchemaLocator<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    /// Follow local `#/definitions/*` and `#/$defs/*` references
    pub fn resolve(&self, schema: &'a Value) -> Option<&'a Value> {
        let mut current = schema;
        for _ in 0..MAX_REF_DEPTH {
            let Some(reference) = current.get("$ref").and_then(|v| v.as_str()) else {
                return Some(current);
            };
            current = self.definition(reference)?;
        }
        tracing::warn!("Reference chain too deep, giving up");
        None
    }

    fn definition(&self, reference: &str) -> Option<&'a Value> {
        let (section, name) = if let Some(name) = reference.strip_prefix("#/definitions/") {
            ("definitions", name)
        } else if let Some(name) = reference.strip_prefix("#/$defs/") {
            ("$defs", name)
        } else {
            tracing::warn!("Unsupported reference: {}", reference);
            return None;
        };
        self.root.get(section)?.get(name)
    }

    /// Schema of the field at `path`, `None` when the path leaves the schema
    pub fn locate(&self, path: &str) -> Option<FieldSchema> {
        let mut current = self.resolve(self.root)?;
        let mut required = false;

        for segment in PropertyPath::parse(path).segments() {
            let (next, is_required) = match (segment, current.get("items")) {
                (PathSegment::Index(idx), Some(items)) => {
                    let item = match items {
                        Value::Array(tuple) => tuple.get(*idx)?,
                        single => single,
                    };
                    (item, false)
                }
                // Numeric keys of an object schema are plain properties
                _ => {
                    let name = segment.key();
                    let listed = current
                        .get("required")
                        .and_then(|v| v.as_array())
                        .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(name.as_str())));
                    (current.get("properties")?.get(&name)?, listed)
                }
            };
            current = self.resolve(next)?;
            required = is_required;
        }

        Some(FieldSchema {
            schema: self.standalone(current),
            required,
        })
    }

    /// Copy of `schema` with the root definitions attached
    fn standalone(&self, schema: &Value) -> Value {
        let mut schema = schema.clone();
        if let Value::Object(obj) = &mut schema {
            for section in ["definitions", "$defs"] {
                if let Some(defs) = self.root.get(section) {
                    obj.entry(section.to_string()).or_insert_with(|| defs.clone());
                }
            }
        }
        schema
    }
}

/// Property names of an object schema
pub fn property_names(schema: &Value) -> Vec<String> {
    schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|props: &Map<String, Value>| props.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_schema() -> Value {
        json!({
            "type": "object",
            "required": ["user"],
            "properties": {
                "user": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string", "title": "Name", "description": "Full name" },
                        "role": { "$ref": "#/definitions/role" },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string", "enum": ["a", "b"], "enumNames": ["Alpha", "Beta"] }
                        }
                    }
                },
                "age": { "type": "integer" }
            },
            "definitions": {
                "role": { "type": "string", "enum": ["admin", "user"] }
            }
        })
    }

    #[test]
    fn test_locate_nested_required() {
        let root = form_schema();
        let locator = SchemaLocator::new(&root);

        let name = locator.locate("user.name").unwrap();
        assert!(name.required);
        assert_eq!(name.title(), Some("Name"));
        assert_eq!(name.description(), Some("Full name"));
        assert_eq!(name.default_widget(), Some("input"));

        let age = locator.locate("age").unwrap();
        assert!(!age.required);
        assert_eq!(age.default_widget(), Some("number"));

        assert!(locator.locate("user.missing").is_none());
    }

    #[test]
    fn test_locate_through_ref() {
        let root = form_schema();
        let role = SchemaLocator::new(&root).locate("user.role").unwrap();
        assert_eq!(role.default_widget(), Some("select"));
        assert_eq!(
            role.enum_options(),
            Some(json!([
                { "label": "admin", "value": "admin" },
                { "label": "user", "value": "user" }
            ]))
        );
        assert!(role.schema.get("definitions").is_some());
    }

    #[test]
    fn test_array_items() {
        let root = form_schema();
        let locator = SchemaLocator::new(&root);

        let tags = locator.locate("user.tags").unwrap();
        assert_eq!(tags.default_widget(), Some("checkbox-group"));
        assert_eq!(
            tags.enum_options(),
            Some(json!([
                { "label": "Alpha", "value": "a" },
                { "label": "Beta", "value": "b" }
            ]))
        );

        let first = locator.locate("user.tags[0]").unwrap();
        assert_eq!(first.schema["type"], json!("string"));
    }

    #[test]
    fn test_to_config() {
        let root = form_schema();
        let config = SchemaLocator::new(&root).locate("user.role").unwrap().to_config("user.role");
        assert_eq!(config.cur_node_path, "user.role");
        assert_eq!(config.widget, Some(WidgetRef::from("select")));
        assert!(!config.required);
        assert_eq!(config.enum_options().len(), 2);

        let config = SchemaLocator::new(&root).locate("user.name").unwrap().to_config("user.name");
        assert_eq!(config.label, "Name");
        assert_eq!(config.description, "Full name");
        assert!(config.required);
        assert!(config.ui_props.is_empty());
    }

    #[test]
    fn test_root_is_container() {
        let root = form_schema();
        let field = SchemaLocator::new(&root).locate("").unwrap();
        assert_eq!(field.default_widget(), None);
        assert!(!field.required);
        let mut names = property_names(&field.schema);
        names.sort();
        assert_eq!(names, vec!["age".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_ref_cycle_gives_up() {
        let root = json!({
            "$ref": "#/definitions/a",
            "definitions": { "a": { "$ref": "#/definitions/a" } }
        });
        assert!(SchemaLocator::new(&root).locate("").is_none());
    }
}
