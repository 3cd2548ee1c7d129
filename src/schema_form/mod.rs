//! Schema form field engine
//!
//! One field of a schema-driven form: value binding into the shared form
//! data tree, enum defaults, validation rules, and composition of the
//! rendered node tree.

pub mod binding;
pub mod enum_default;
pub mod path;
pub mod registry;
pub mod relay;
pub mod render;
pub mod schema;
pub mod validation;
pub mod validator;
pub mod widget;

pub use binding::{BindingSource, FormDataStore, SharedFormData, ValueBinding};
pub use enum_default::{apply_enum_default, enum_default};
pub use path::{get_path_val, is_root, set_path_val, to_validation_prop, PropertyPath, ROOT_PROP};
pub use registry::{ComponentHandle, ComponentRegistry, WidgetRef};
pub use relay::{GetWidget, InstanceHandle, InstanceHandleRelay};
pub use render::{DescriptionMode, RenderComposer};
pub use schema::{property_names, FieldSchema, SchemaLocator};
pub use validation::{
    CustomRule, CustomRuleContext, FieldError, Trigger, ValidationAdapter, ValidationCallback,
    ValidationOutcome, ValidationRule,
};
pub use validator::{CustomFormats, FieldIssue, JsonSchemaValidator, SchemaValidator, ValidateRequest};
pub use widget::Widget;
