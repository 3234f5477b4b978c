use crate::config::Theme;
use crate::error::PluginError;
use crate::plugin::{PluginDescriptor, UtilityPlugin};
use crate::rule_bag::{PropertyMap, RuleBag};
use indexmap::IndexMap;

/// Rules declared verbatim in a `[[plugins]]` entry.
#[derive(Debug, Clone)]
pub struct StaticRulesPlugin {
    descriptor: PluginDescriptor,
    rules: IndexMap<String, PropertyMap>,
}

impl StaticRulesPlugin {
    pub fn new(descriptor: PluginDescriptor, rules: IndexMap<String, PropertyMap>) -> Self {
        Self { descriptor, rules }
    }
}

impl UtilityPlugin for StaticRulesPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn populate(&self, _theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError> {
        for (selector, properties) in &self.rules {
            if selector.trim().is_empty() {
                return Err(PluginError::new("rule selector must not be empty"));
            }
            bag.set(selector.clone(), properties.clone());
        }
        Ok(())
    }
}
