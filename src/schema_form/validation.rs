//! Per-field validation rule
//!
//! The adapter builds the rule handed to the form-item container. The
//! container evaluates it on its trigger and receives the outcome through a
//! callback, so custom rules may answer later than the call that started them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

use super::binding::FormDataStore;
use super::path::{is_root, to_validation_prop, ROOT_PROP};
use super::validator::{CustomFormats, SchemaValidator, ValidateRequest};
use crate::domain::WidgetConfig;

/// When the host evaluates a rule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    #[default]
    Blur,
    Change,
}

/// Reason a field failed validation. `Display` is the line shown to the user.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// First schema issue at this field
    #[error("{0}")]
    Schema(String),

    /// Message reported by the custom rule
    #[error("{0}")]
    Custom(String),

    /// Integration fault, e.g. a schema that does not compile
    #[error("{0}")]
    Fault(String),
}

impl FieldError {
    pub fn is_fault(&self) -> bool {
        matches!(self, FieldError::Fault(_))
    }
}

pub type ValidationOutcome = std::result::Result<(), FieldError>;

/// Receives the outcome of one rule evaluation
#[derive(Clone)]
pub struct ValidationCallback(Arc<dyn Fn(ValidationOutcome) + Send + Sync>);

impl ValidationCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(ValidationOutcome) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, outcome: ValidationOutcome) {
        (self.0)(outcome)
    }

    pub fn pass(&self) {
        self.call(Ok(()))
    }

    /// Custom rule failure
    pub fn fail(&self, message: impl Into<String>) {
        self.call(Err(FieldError::Custom(message.into())))
    }

    /// `None` passes, `Some(message)` fails
    pub fn respond(&self, message: Option<String>) {
        match message {
            Some(message) => self.fail(message),
            None => self.pass(),
        }
    }
}

impl fmt::Debug for ValidationCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidationCallback")
    }
}

/// Arguments of a custom rule
#[derive(Debug)]
pub struct CustomRuleContext {
    /// Node path of the field
    pub field: String,
    /// Value under validation (the whole tree for the root field)
    pub value: Option<Value>,
    pub root_form_data: Value,
    /// Must be called once the rule has decided
    pub callback: ValidationCallback,
}

/// User-supplied rule run after schema validation passed
pub type CustomRule = Arc<dyn Fn(CustomRuleContext) + Send + Sync>;

type RuleFn = Arc<dyn Fn(Option<Value>, ValidationCallback) + Send + Sync>;

/// Rule descriptor attached to the form-item container
#[derive(Clone)]
pub struct ValidationRule {
    pub trigger: Trigger,
    validator: RuleFn,
}

impl ValidationRule {
    pub fn new<F>(trigger: Trigger, validator: F) -> Self
    where
        F: Fn(Option<Value>, ValidationCallback) + Send + Sync + 'static,
    {
        Self {
            trigger,
            validator: Arc::new(validator),
        }
    }

    pub fn validate(&self, value: Option<Value>, callback: ValidationCallback) {
        (self.validator)(value, callback)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Validation Adapter
// ============================================================================

/// Schema validation followed by the optional custom rule for one field
pub struct ValidationAdapter {
    path: String,
    schema: Value,
    ui_schema: Value,
    error_schema: Value,
    custom_formats: CustomFormats,
    required: bool,
    custom_rule: Option<CustomRule>,
    validator: Arc<dyn SchemaValidator>,
    store: Arc<dyn FormDataStore>,
}

impl ValidationAdapter {
    pub fn from_config(config: &WidgetConfig, store: Arc<dyn FormDataStore>) -> Self {
        Self {
            path: config.cur_node_path.clone(),
            schema: config.schema.clone(),
            ui_schema: config.ui_schema.clone(),
            error_schema: config.error_schema.clone(),
            custom_formats: config.custom_formats.clone(),
            required: config.required,
            custom_rule: config.custom_rule.clone(),
            validator: Arc::clone(&config.validator),
            store,
        }
    }

    /// Property path handed to the schema validator
    pub fn prop(&self) -> String {
        if is_root(&self.path) {
            ROOT_PROP.to_string()
        } else {
            to_validation_prop(&self.path)
        }
    }

    /// Evaluate `value`; the outcome is delivered through `callback`
    pub fn validate(&self, value: Option<Value>, callback: ValidationCallback) {
        // The root field validates the whole tree, whatever the host passed in
        let value = if is_root(&self.path) {
            Some(self.store.snapshot())
        } else {
            value
        };

        let prop = self.prop();
        let request = ValidateRequest {
            form_data: value.as_ref(),
            schema: &self.schema,
            ui_schema: &self.ui_schema,
            custom_formats: &self.custom_formats,
            error_schema: &self.error_schema,
            required: self.required,
            prop_path: &prop,
        };

        match self.validator.validate(&request) {
            Err(err) => {
                error!(path = %self.path, error = %err, "Schema validator failed");
                callback.call(Err(FieldError::Fault(err.to_string())));
                return;
            }
            Ok(issues) => {
                if let Some(first) = issues.into_iter().next() {
                    debug!(path = %self.path, keyword = %first.keyword, "Schema validation failed");
                    callback.call(Err(FieldError::Schema(first.message)));
                    return;
                }
            }
        }

        match &self.custom_rule {
            Some(rule) => rule(CustomRuleContext {
                field: self.path.clone(),
                value,
                root_form_data: self.store.snapshot(),
                callback,
            }),
            None => callback.pass(),
        }
    }

    /// Blur-triggered rule descriptor owning this adapter
    pub fn into_rule(self) -> ValidationRule {
        let adapter = Arc::new(self);
        ValidationRule::new(Trigger::Blur, move |value, callback| {
            adapter.validate(value, callback)
        })
    }
}

impl fmt::Debug for ValidationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationAdapter")
            .field("path", &self.path)
            .field("required", &self.required)
            .field("custom_rule", &self.custom_rule.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SchemaFormError};
    use crate::schema_form::binding::SharedFormData;
    use crate::schema_form::validator::FieldIssue;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// Records the value it saw and returns fixed messages
    struct StubValidator {
        messages: Vec<&'static str>,
        seen: Mutex<Vec<(Option<Value>, String)>>,
    }

    impl StubValidator {
        fn new(messages: Vec<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                messages,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl SchemaValidator for StubValidator {
        fn validate(&self, request: &ValidateRequest<'_>) -> Result<Vec<FieldIssue>> {
            self.seen
                .lock()
                .unwrap()
                .push((request.form_data.cloned(), request.prop_path.to_string()));
            Ok(self
                .messages
                .iter()
                .map(|m| FieldIssue {
                    keyword: "stub".to_string(),
                    property: request.prop_path.to_string(),
                    message: m.to_string(),
                })
                .collect())
        }
    }

    struct FaultyValidator;

    impl SchemaValidator for FaultyValidator {
        fn validate(&self, _request: &ValidateRequest<'_>) -> Result<Vec<FieldIssue>> {
            Err(SchemaFormError::InvalidSchema("bad schema".to_string()))
        }
    }

    fn capture() -> (ValidationCallback, Arc<Mutex<Vec<ValidationOutcome>>>) {
        let outcomes = Arc::new(Mutex::new(Vec::new()));
        let sink = outcomes.clone();
        let callback = ValidationCallback::new(move |outcome| sink.lock().unwrap().push(outcome));
        (callback, outcomes)
    }

    fn adapter(config: &WidgetConfig, tree: Value) -> ValidationAdapter {
        ValidationAdapter::from_config(config, Arc::new(SharedFormData::new(tree)))
    }

    #[test]
    fn test_root_validates_whole_tree() {
        let stub = StubValidator::new(vec![]);
        let config = WidgetConfig {
            validator: stub.clone(),
            ..Default::default()
        };
        let tree = json!({ "a": 1, "b": [true] });
        let (callback, outcomes) = capture();

        adapter(&config, tree.clone()).validate(Some(json!("ignored")), callback);

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen[0], (Some(tree), ROOT_PROP.to_string()));
        assert_eq!(*outcomes.lock().unwrap(), vec![Ok(())]);
    }

    #[test]
    fn test_nested_prop_path() {
        let stub = StubValidator::new(vec![]);
        let config = WidgetConfig {
            cur_node_path: "user.tags[1]".to_string(),
            validator: stub.clone(),
            ..Default::default()
        };
        let (callback, _) = capture();
        adapter(&config, json!({})).validate(Some(json!("x")), callback);

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen[0], (Some(json!("x")), "user.tags.1".to_string()));
    }

    #[test]
    fn test_first_error_only_and_custom_rule_skipped() {
        let invoked = Arc::new(AtomicBool::new(false));
        let flag = invoked.clone();
        let rule: CustomRule = Arc::new(move |ctx: CustomRuleContext| {
            flag.store(true, Ordering::SeqCst);
            ctx.callback.pass();
        });
        let config = WidgetConfig {
            cur_node_path: "name".to_string(),
            custom_rule: Some(rule),
            validator: StubValidator::new(vec!["E1", "E2"]),
            ..Default::default()
        };
        let (callback, outcomes) = capture();

        adapter(&config, json!({})).validate(Some(json!("")), callback);

        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![Err(FieldError::Schema("E1".to_string()))]
        );
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[test]
    fn test_absent_custom_rule_passes() {
        let config = WidgetConfig {
            cur_node_path: "name".to_string(),
            validator: StubValidator::new(vec![]),
            ..Default::default()
        };
        let (callback, outcomes) = capture();
        adapter(&config, json!({})).validate(Some(json!("ok")), callback);
        assert_eq!(*outcomes.lock().unwrap(), vec![Ok(())]);
    }

    #[test]
    fn test_custom_rule_receives_context() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let rule: CustomRule = Arc::new(move |ctx: CustomRuleContext| {
            *sink.lock().unwrap() = Some((ctx.field.clone(), ctx.value.clone(), ctx.root_form_data.clone()));
            ctx.callback.fail("taken");
        });
        let config = WidgetConfig {
            cur_node_path: "user.name".to_string(),
            custom_rule: Some(rule),
            validator: StubValidator::new(vec![]),
            ..Default::default()
        };
        let tree = json!({ "user": { "name": "ada" } });
        let (callback, outcomes) = capture();

        adapter(&config, tree.clone()).validate(Some(json!("ada")), callback);

        assert_eq!(
            *seen.lock().unwrap(),
            Some(("user.name".to_string(), Some(json!("ada")), tree))
        );
        assert_eq!(
            *outcomes.lock().unwrap(),
            vec![Err(FieldError::Custom("taken".to_string()))]
        );
    }

    #[test]
    fn test_validator_fault_is_reported() {
        let config = WidgetConfig {
            cur_node_path: "a".to_string(),
            validator: Arc::new(FaultyValidator),
            ..Default::default()
        };
        let (callback, outcomes) = capture();
        adapter(&config, json!({})).validate(None, callback);

        let outcomes = outcomes.lock().unwrap();
        assert!(matches!(&outcomes[0], Err(err) if err.is_fault()));
    }

    #[test]
    fn test_rule_descriptor_runs_adapter() {
        let config = WidgetConfig {
            cur_node_path: "a".to_string(),
            required: true,
            ..Default::default()
        };
        let rule = adapter(&config, json!({})).into_rule();
        assert_eq!(rule.trigger, Trigger::Blur);

        let (callback, outcomes) = capture();
        rule.validate(None, callback);
        let outcomes = outcomes.lock().unwrap();
        assert!(matches!(&outcomes[0], Err(FieldError::Schema(msg)) if msg.contains("'a'")));
    }

    #[test]
    fn test_trigger_names() {
        assert_eq!(serde_json::to_value(Trigger::Blur).unwrap(), json!("blur"));
        assert_eq!(serde_json::to_value(Trigger::Change).unwrap(), json!("change"));
        let parsed: Trigger = serde_json::from_value(json!("change")).unwrap();
        assert_eq!(parsed, Trigger::Change);
        assert_eq!(Trigger::default(), Trigger::Blur);
    }
}
