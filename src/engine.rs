use crate::config::Theme;
use crate::error::GenerationError;
use crate::generator::{OutputStyle, Stylesheet, render};
use crate::plugin::PluginRegistry;
use crate::rule_bag::{PropertyMap, RuleBag};
use std::collections::HashMap;

/// The merged rule bag of one generation run, plus which plugin wrote each
/// selector last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    bag: RuleBag,
    owners: HashMap<String, String>,
}

impl Generation {
    pub fn from_bag(bag: RuleBag) -> Self {
        Self {
            bag,
            owners: HashMap::new(),
        }
    }

    pub fn bag(&self) -> &RuleBag {
        &self.bag
    }

    pub fn into_bag(self) -> RuleBag {
        self.bag
    }

    pub fn owner(&self, selector: &str) -> Option<&str> {
        self.owners.get(selector).map(String::as_str)
    }

    pub fn remove(&mut self, selector: &str) -> Option<PropertyMap> {
        self.owners.remove(selector);
        self.bag.remove(selector)
    }

    pub fn render(&self, style: OutputStyle) -> Stylesheet {
        render(&self.bag, style)
    }

    pub fn len(&self) -> usize {
        self.bag.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bag.is_empty()
    }
}

/// Runs every registered plugin in execution order. The first plugin error
/// aborts the run; nothing partial is returned.
pub fn generate(theme: &Theme, registry: &PluginRegistry) -> Result<Generation, GenerationError> {
    let mut generation = Generation::default();

    for plugin in registry.execution_order() {
        let namespace = plugin.namespace();
        let mut scratch = RuleBag::new();
        plugin
            .populate(theme, &mut scratch)
            .map_err(|source| GenerationError::PluginExecution {
                namespace: namespace.to_string(),
                source,
            })?;
        tracing::debug!(
            namespace,
            priority = ?plugin.priority(),
            index = plugin.index(),
            rules = scratch.len(),
            "plugin populated rules"
        );
        for selector in scratch.selectors() {
            generation
                .owners
                .insert(selector.to_string(), namespace.to_string());
        }
        generation.bag.merge(scratch);
    }

    Ok(generation)
}

#[cfg(test)]
mod tests {
    use super::{Generation, generate};
    use crate::config::Theme;
    use crate::error::{GenerationError, PluginError};
    use crate::generator::OutputStyle;
    use crate::plugin::{GenerationPriority, PluginDescriptor, PluginRegistry, UtilityPlugin};
    use crate::rule_bag::{RuleBag, property_map};
    use crate::utilities::default_registry;

    struct Fixed {
        descriptor: PluginDescriptor,
        rules: Vec<(&'static str, &'static str)>,
    }

    impl Fixed {
        fn boxed(
            namespace: &str,
            priority: GenerationPriority,
            index: i32,
            rules: Vec<(&'static str, &'static str)>,
        ) -> Box<dyn UtilityPlugin> {
            Box::new(Self {
                descriptor: PluginDescriptor::new(namespace, namespace)
                    .with_priority(priority)
                    .with_index(index),
                rules,
            })
        }
    }

    impl UtilityPlugin for Fixed {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.descriptor
        }

        fn populate(&self, _theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError> {
            for (selector, color) in &self.rules {
                bag.set(*selector, property_map([("color", *color)]));
            }
            Ok(())
        }
    }

    struct Failing(PluginDescriptor);

    impl UtilityPlugin for Failing {
        fn descriptor(&self) -> &PluginDescriptor {
            &self.0
        }

        fn populate(&self, _theme: &Theme, _bag: &mut RuleBag) -> Result<(), PluginError> {
            Err(PluginError::new("boom"))
        }
    }

    #[test]
    fn later_plugins_win_selector_collisions() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Fixed::boxed(
                "com.test.late",
                GenerationPriority::After,
                0,
                vec![(".a", "red")],
            ))
            .expect("register");
        registry
            .register(Fixed::boxed(
                "com.test.early",
                GenerationPriority::Before,
                0,
                vec![(".a", "blue"), (".b", "blue")],
            ))
            .expect("register");

        let generation = generate(&Theme::default(), &registry).expect("generate");
        assert_eq!(
            generation.bag().get(".a"),
            Some(&property_map([("color", "red")]))
        );
        assert_eq!(generation.owner(".a"), Some("com.test.late"));
        assert_eq!(generation.owner(".b"), Some("com.test.early"));
        assert_eq!(
            generation.bag().selectors().collect::<Vec<_>>(),
            vec![".a", ".b"]
        );
    }

    #[test]
    fn index_orders_within_a_tier() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Fixed::boxed(
                "com.test.second",
                GenerationPriority::Before,
                5,
                vec![(".x", "second")],
            ))
            .expect("register");
        registry
            .register(Fixed::boxed(
                "com.test.first",
                GenerationPriority::Before,
                -1,
                vec![(".x", "first")],
            ))
            .expect("register");

        let generation = generate(&Theme::default(), &registry).expect("generate");
        assert_eq!(generation.owner(".x"), Some("com.test.second"));
    }

    #[test]
    fn plugin_failure_aborts_generation() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Fixed::boxed(
                "com.test.ok",
                GenerationPriority::Before,
                0,
                vec![(".a", "red")],
            ))
            .expect("register");
        registry
            .register(Box::new(Failing(PluginDescriptor::new(
                "com.test.broken",
                "broken",
            ))))
            .expect("register");

        assert_eq!(
            generate(&Theme::default(), &registry),
            Err(GenerationError::PluginExecution {
                namespace: "com.test.broken".to_string(),
                source: PluginError::new("boom"),
            })
        );
    }

    #[test]
    fn default_registry_is_deterministic() {
        let theme = Theme::default();
        let registry = default_registry().expect("default registry");
        let first = generate(&theme, &registry).expect("generate");
        let second = generate(&theme, &registry).expect("generate");
        assert_eq!(
            first.render(OutputStyle::Expanded),
            second.render(OutputStyle::Expanded)
        );
        assert!(first.bag().contains(".bg-red-500"));
        assert!(first.bag().contains(".hover-bg-red-500:hover"));
        assert!(first.bag().contains(".p-4"));
        assert!(first.bag().contains(".rounded"));
        assert!(first.bag().contains(".flex"));
        assert!(first.bag().contains(".items-center"));
    }

    #[test]
    fn remove_drops_selector_and_owner() {
        let mut generation = Generation::from_bag(
            [(".a".to_string(), property_map([("color", "red")]))]
                .into_iter()
                .collect(),
        );
        assert!(generation.remove(".a").is_some());
        assert!(generation.is_empty());
        assert_eq!(generation.owner(".a"), None);
    }
}
