use crate::config::Theme;
use crate::error::{ConfigurationError, PluginError};
use crate::rule_bag::RuleBag;
use crate::scanner::UsedClasses;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPriority {
    #[default]
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PluginDescriptor {
    pub namespace: String,
    pub name: String,
    pub description: String,
    pub priority: GenerationPriority,
    pub index: i32,
    pub options: Option<toml::Value>,
}

impl PluginDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            description: String::new(),
            priority: GenerationPriority::Before,
            index: 0,
            options: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: GenerationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_index(mut self, index: i32) -> Self {
        self.index = index;
        self
    }

    pub fn with_options(mut self, options: Option<toml::Value>) -> Self {
        self.options = options;
        self
    }

    pub fn decode_options<T>(&self) -> Result<T, ConfigurationError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(options) = self.options.clone() else {
            return Ok(T::default());
        };
        options
            .try_into()
            .map_err(|err: toml::de::Error| ConfigurationError::InvalidOptions {
                namespace: self.namespace.clone(),
                message: err.message().to_string(),
            })
    }
}

pub fn validate_namespace(namespace: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: &str| ConfigurationError::InvalidNamespace {
        namespace: namespace.to_string(),
        reason: reason.to_string(),
    };
    if namespace.trim().is_empty() {
        return Err(invalid("namespace is empty"));
    }
    let segments = namespace.split('.').collect::<Vec<_>>();
    if segments.len() < 2 {
        return Err(invalid("expected a reverse-domain name such as com.example.utility"));
    }
    for segment in segments {
        if segment.is_empty() {
            return Err(invalid("contains an empty segment"));
        }
        if !segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(invalid("segments may only contain [A-Za-z0-9_-]"));
        }
    }
    Ok(())
}

pub trait ClassExtractor: Send + Sync {
    fn extract(&self, text: &str) -> UsedClasses;
}

pub trait UtilityPlugin: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    /// Writes this plugin's rules into `bag`. Called once per generation run.
    fn populate(&self, theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError>;

    fn on_purge_complete(&self, _theme: &Theme, _bag: &RuleBag) {}

    fn class_extractor(&self) -> Option<&dyn ClassExtractor> {
        None
    }

    fn namespace(&self) -> &str {
        &self.descriptor().namespace
    }

    fn priority(&self) -> GenerationPriority {
        self.descriptor().priority
    }

    fn index(&self) -> i32 {
        self.descriptor().index
    }
}

#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn UtilityPlugin>>,
    namespaces: HashSet<String>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, plugin: Box<dyn UtilityPlugin>) -> Result<(), ConfigurationError> {
        let namespace = plugin.namespace().to_string();
        validate_namespace(&namespace)?;
        if !self.namespaces.insert(namespace.clone()) {
            return Err(ConfigurationError::DuplicateNamespace(namespace));
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn get(&self, namespace: &str) -> Option<&dyn UtilityPlugin> {
        self.plugins
            .iter()
            .find(|plugin| plugin.namespace() == namespace)
            .map(|plugin| plugin.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn UtilityPlugin> {
        self.plugins.iter().map(|plugin| plugin.as_ref())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// `Before` tier first, then `After`; ascending index within a tier,
    /// registration order on ties.
    pub fn execution_order(&self) -> Vec<&dyn UtilityPlugin> {
        let mut ordered = self.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|plugin| (plugin.priority(), plugin.index()));
        ordered
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|plugin| plugin.namespace()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GenerationPriority, PluginDescriptor, PluginRegistry, UtilityPlugin, validate_namespace,
    };
    use crate::config::Theme;
    use crate::error::{ConfigurationError, PluginError};
    use crate::rule_bag::RuleBag;
    use serde::Deserialize;

    struct Noop(PluginDescriptor);

    impl UtilityPlugin for Noop {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.0
        }

        fn populate(&self, _theme: &Theme, _bag: &mut RuleBag) -> Result<(), PluginError> {
            Ok(())
        }
    }

    fn noop(namespace: &str, priority: GenerationPriority, index: i32) -> Box<dyn UtilityPlugin> {
        Box::new(Noop(
            PluginDescriptor::new(namespace, namespace)
                .with_priority(priority)
                .with_index(index),
        ))
    }

    #[test]
    fn orders_by_tier_then_index_then_registration() {
        let mut registry = PluginRegistry::new();
        registry
            .register(noop("com.test.after-low", GenerationPriority::After, 0))
            .expect("register");
        registry
            .register(noop("com.test.before-high", GenerationPriority::Before, 5))
            .expect("register");
        registry
            .register(noop("com.test.before-low-a", GenerationPriority::Before, 1))
            .expect("register");
        registry
            .register(noop("com.test.before-low-b", GenerationPriority::Before, 1))
            .expect("register");
        registry
            .register(noop("com.test.after-negative", GenerationPriority::After, -3))
            .expect("register");

        let order = registry
            .execution_order()
            .into_iter()
            .map(|plugin| plugin.namespace().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            vec![
                "com.test.before-low-a",
                "com.test.before-low-b",
                "com.test.before-high",
                "com.test.after-negative",
                "com.test.after-low",
            ]
        );
    }

    #[test]
    fn rejects_duplicate_namespace() {
        let mut registry = PluginRegistry::new();
        registry
            .register(noop("com.test.dup", GenerationPriority::Before, 0))
            .expect("first registration should succeed");
        let err = registry
            .register(noop("com.test.dup", GenerationPriority::After, 1))
            .expect_err("duplicate should fail");
        assert_eq!(
            err,
            ConfigurationError::DuplicateNamespace("com.test.dup".to_string())
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn validates_reverse_domain_namespaces() {
        assert!(validate_namespace("com.example.utility").is_ok());
        assert!(validate_namespace("io.my_org.bg-2").is_ok());
        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("plain").is_err());
        assert!(validate_namespace("com..empty").is_err());
        assert!(validate_namespace("com.bad space").is_err());
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Options {
        #[serde(default)]
        class_tag: Option<String>,
    }

    #[test]
    fn decodes_plugin_options() {
        let options: toml::Value = toml::from_str("class_tag = \"pad\"").expect("toml");
        let descriptor = PluginDescriptor::new("com.test.opts", "opts").with_options(Some(options));
        let decoded: Options = descriptor.decode_options().expect("options should decode");
        assert_eq!(decoded.class_tag.as_deref(), Some("pad"));

        let empty = PluginDescriptor::new("com.test.opts", "opts");
        assert_eq!(empty.decode_options::<Options>().expect("default"), Options::default());

        let bad: toml::Value = toml::from_str("class_tag = 3").expect("toml");
        let descriptor = PluginDescriptor::new("com.test.opts", "opts").with_options(Some(bad));
        assert!(matches!(
            descriptor.decode_options::<Options>(),
            Err(ConfigurationError::InvalidOptions { .. })
        ));
    }
}
