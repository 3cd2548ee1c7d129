//! Schema validator contract and the default `jsonschema`-backed validator

use jsonschema::error::ValidationErrorKind;
use jsonschema::Draft;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Result, SchemaFormError};

/// Predicate for a custom `format` keyword value
pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Format name -> predicate
pub type CustomFormats = BTreeMap<String, FormatFn>;

/// Everything a validator gets to see for one field
pub struct ValidateRequest<'a> {
    /// Value to validate, `None` when undefined
    pub form_data: Option<&'a Value>,
    pub schema: &'a Value,
    pub ui_schema: &'a Value,
    pub custom_formats: &'a CustomFormats,
    pub error_schema: &'a Value,
    pub required: bool,
    pub prop_path: &'a str,
}

/// One validation problem found at the field itself
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub keyword: String,
    pub property: String,
    pub message: String,
}

/// Validates one field value against its schema.
///
/// An empty list means valid. `Err` is an integration fault (e.g. a schema the
/// engine cannot compile), never a user input problem.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, request: &ValidateRequest<'_>) -> Result<Vec<FieldIssue>>;
}

// ============================================================================
// JSON Schema Validator
// ============================================================================

/// Draft 7 validator.
///
/// Only issues located at the field itself are reported; nested values are
/// validated by their own fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    fn compile(&self, schema: &Value, formats: &CustomFormats) -> Result<jsonschema::Validator> {
        let mut options = jsonschema::options();
        options.with_draft(Draft::Draft7).should_validate_formats(true);
        for (name, check) in formats {
            let check = Arc::clone(check);
            options.with_format(name.clone(), move |value: &str| check(value));
        }
        options
            .build(schema)
            .map_err(|err| SchemaFormError::InvalidSchema(err.to_string()))
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn validate(&self, request: &ValidateRequest<'_>) -> Result<Vec<FieldIssue>> {
        let is_array_schema = request.schema.get("type").and_then(|t| t.as_str()) == Some("array");
        let empty_array = is_array_schema
            && matches!(request.form_data, Some(Value::Array(items)) if items.is_empty());

        let instance = match request.form_data {
            _ if request.required && (request.form_data.is_none() || empty_array) => {
                return Ok(vec![FieldIssue {
                    keyword: "required".to_string(),
                    property: request.prop_path.to_string(),
                    message: user_message("required", request)
                        .unwrap_or_else(|| required_message(request.prop_path)),
                }]);
            }
            None => return Ok(Vec::new()),
            Some(value) => value,
        };

        let validator = self.compile(request.schema, request.custom_formats)?;
        let issues = validator
            .iter_errors(instance)
            .filter(|err| err.instance_path.to_string().is_empty())
            .filter_map(|err| {
                let keyword = keyword_of(&err.kind)?;
                let message = user_message(keyword, request).unwrap_or_else(|| err.to_string());
                Some(FieldIssue {
                    keyword: keyword.to_string(),
                    property: request.prop_path.to_string(),
                    message,
                })
            })
            .collect();
        Ok(issues)
    }
}

fn required_message(prop_path: &str) -> String {
    format!("should have required property '{}'", prop_path)
}

/// Keyword of an engine error. `required` of an object is left to the child
/// fields, which report their own missing values.
fn keyword_of(kind: &ValidationErrorKind) -> Option<&'static str> {
    let keyword = match kind {
        ValidationErrorKind::Required { .. } => return None,
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::UniqueItems { .. } => "uniqueItems",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf { .. } => "anyOf",
        ValidationErrorKind::OneOfNotValid { .. } | ValidationErrorKind::OneOfMultipleValid { .. } => "oneOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::Contains { .. } => "contains",
        _ => "schema",
    };
    Some(keyword)
}

/// Message configured by the user for `keyword`.
///
/// Looks for `err:<keyword>` and then `err:options.<keyword>` in the error
/// schema, the ui schema and the schema, in that order.
fn user_message(keyword: &str, request: &ValidateRequest<'_>) -> Option<String> {
    let direct_key = format!("err:{}", keyword);
    [request.error_schema, request.ui_schema, request.schema]
        .into_iter()
        .find_map(|source| {
            source
                .get(&direct_key)
                .or_else(|| source.get("err:options").and_then(|opts| opts.get(keyword)))
                .and_then(|v| v.as_str())
                .map(String::from)
        })
}
