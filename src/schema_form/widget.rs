//! Field instance
//!
//! Ties the pieces together for one field: enum defaults and the instance
//! relay are set up once in [`Widget::new`], everything else is rebuilt from
//! the fresh config on each [`Widget::render`].

use std::fmt;
use std::sync::Arc;
use tracing::error;

use super::binding::{FormDataStore, ValueBinding};
use super::enum_default::apply_enum_default;
use super::relay::InstanceHandleRelay;
use super::render::RenderComposer;
use super::validation::{ValidationAdapter, ValidationRule};
use crate::domain::vnode::{ModelBinding, VNode};
use crate::domain::WidgetConfig;
use crate::error::Result;

pub struct Widget {
    store: Arc<dyn FormDataStore>,
    relay: Option<Arc<InstanceHandleRelay>>,
}

impl Widget {
    /// Construct the field. Fails only when the enum default cannot be
    /// written into the tree.
    pub fn new(config: &WidgetConfig, store: Arc<dyn FormDataStore>) -> Result<Self> {
        let binding = ValueBinding::from_config(config, Arc::clone(&store));
        apply_enum_default(&binding, config)?;

        let relay = config
            .get_widget
            .clone()
            .map(|callback| Arc::new(InstanceHandleRelay::new(callback)));

        Ok(Self { store, relay })
    }

    /// Binding for this render pass
    pub fn binding(&self, config: &WidgetConfig) -> ValueBinding {
        ValueBinding::from_config(config, Arc::clone(&self.store))
    }

    /// Rule for this render pass; only tree-bound fields are validated
    pub fn validation_rule(&self, config: &WidgetConfig) -> Option<ValidationRule> {
        config
            .is_form_data
            .then(|| ValidationAdapter::from_config(config, Arc::clone(&self.store)).into_rule())
    }

    pub fn relay(&self) -> Option<&Arc<InstanceHandleRelay>> {
        self.relay.as_ref()
    }

    pub fn render(&self, config: &WidgetConfig) -> VNode {
        let binding = self.binding(config);
        let path = config.cur_node_path.clone();
        let model = ModelBinding::new(binding.read(), move |value| {
            if let Err(err) = binding.write(value) {
                error!(path = %path, error = %err, "Failed to write field value");
            }
        });

        RenderComposer::new(&config.registry).compose(
            config,
            model,
            self.validation_rule(config),
            self.relay.clone(),
        )
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("relay", &self.relay)
            .finish_non_exhaustive()
    }
}
