mod color;
mod keyword;
mod scale;
mod static_rules;

pub use color::ColorUtility;
pub use keyword::KeywordUtility;
pub use scale::ScaleUtility;
pub use static_rules::StaticRulesPlugin;

use crate::config::{Config, PluginEntry, Theme};
use crate::dictionary::expand_modifier_template;
use crate::error::{ConfigurationError, PluginError};
use crate::naming::{add_custom_prefix, class_selector, generate_class_name};
use crate::plugin::{GenerationPriority, PluginDescriptor, PluginRegistry, UtilityPlugin};
use crate::rule_bag::{PropertyMap, RuleBag};
use serde::Deserialize;

pub const BACKGROUND_COLOR: &str = "com.usswind.background-color";
pub const TEXT_COLOR: &str = "com.usswind.text-color";
pub const BORDER_COLOR: &str = "com.usswind.border-color";
pub const PADDING: &str = "com.usswind.padding";
pub const MARGIN: &str = "com.usswind.margin";
pub const WIDTH: &str = "com.usswind.width";
pub const HEIGHT: &str = "com.usswind.height";
pub const BORDER_RADIUS: &str = "com.usswind.border-radius";
pub const BORDER_WIDTH: &str = "com.usswind.border-width";
pub const FONT_SIZE: &str = "com.usswind.font-size";
pub const OPACITY: &str = "com.usswind.opacity";
pub const DISPLAY: &str = "com.usswind.display";
pub const FLEX: &str = "com.usswind.flex";
pub const ALIGN_ITEMS: &str = "com.usswind.align-items";
pub const JUSTIFY_CONTENT: &str = "com.usswind.justify-content";

const BUILTINS: [(&str, &str, &str); 15] = [
    (BACKGROUND_COLOR, "Background color", "bg-{color}-{shade}"),
    (TEXT_COLOR, "Text color", "text-{color}-{shade}"),
    (BORDER_COLOR, "Border color", "border-{color}-{shade}"),
    (PADDING, "Padding", "p-{size}, px-{size}, pt-{size}, ..."),
    (MARGIN, "Margin", "m-{size}, mx-{size}, mt-{size}, ..."),
    (WIDTH, "Width", "w-{size}"),
    (HEIGHT, "Height", "h-{size}"),
    (BORDER_RADIUS, "Border radius", "rounded, rounded-{size}"),
    (BORDER_WIDTH, "Border width", "border, border-{width}"),
    (FONT_SIZE, "Font size", "text-{size}"),
    (OPACITY, "Opacity", "opacity-{amount}"),
    (DISPLAY, "Display", "flex, hidden"),
    (FLEX, "Flex layout", "flex-row, flex-col, flex-wrap, flex-grow, ..."),
    (ALIGN_ITEMS, "Align items", "items-start, items-center, ..."),
    (JUSTIFY_CONTENT, "Justify content", "justify-start, justify-between, ..."),
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UtilityOptions {
    #[serde(default)]
    pub class_tag: Option<String>,
    #[serde(default)]
    pub modifiers: Option<bool>,
}

impl UtilityOptions {
    fn tag<'a>(&'a self, default: &'a str) -> &'a str {
        self.class_tag.as_deref().unwrap_or(default)
    }
}

pub fn builtin_descriptors() -> Vec<PluginDescriptor> {
    BUILTINS
        .iter()
        .map(|(namespace, name, description)| {
            PluginDescriptor::new(*namespace, *name).with_description(*description)
        })
        .collect()
}

pub fn builtin_plugin(
    descriptor: PluginDescriptor,
) -> Result<Box<dyn UtilityPlugin>, ConfigurationError> {
    let options: UtilityOptions = descriptor.decode_options()?;
    let plugin: Box<dyn UtilityPlugin> = match descriptor.namespace.as_str() {
        BACKGROUND_COLOR => Box::new(ColorUtility::new(
            descriptor,
            &options,
            "bg",
            "background-color",
        )),
        TEXT_COLOR => Box::new(ColorUtility::new(descriptor, &options, "text", "color")),
        BORDER_COLOR => Box::new(ColorUtility::new(
            descriptor,
            &options,
            "border",
            "border-color",
        )),
        PADDING => Box::new(ScaleUtility::sided(descriptor, &options, "p", "padding")),
        MARGIN => Box::new(ScaleUtility::sided(descriptor, &options, "m", "margin")),
        WIDTH => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "w",
            "width",
            |theme| &theme.spacing,
        )),
        HEIGHT => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "h",
            "height",
            |theme| &theme.spacing,
        )),
        BORDER_RADIUS => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "rounded",
            "border-radius",
            |theme| &theme.border_radius,
        )),
        BORDER_WIDTH => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "border",
            "border-width",
            |theme| &theme.border_width,
        )),
        FONT_SIZE => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "text",
            "font-size",
            |theme| &theme.font_size,
        )),
        OPACITY => Box::new(ScaleUtility::single(
            descriptor,
            &options,
            "opacity",
            "opacity",
            |theme| &theme.opacity,
        )),
        DISPLAY => Box::new(KeywordUtility::new(
            descriptor,
            &options,
            "",
            keyword::DISPLAY_VALUES,
        )),
        FLEX => Box::new(KeywordUtility::new(
            descriptor,
            &options,
            "flex",
            keyword::FLEX_VALUES,
        )),
        ALIGN_ITEMS => Box::new(KeywordUtility::new(
            descriptor,
            &options,
            "items",
            keyword::ALIGN_ITEMS_VALUES,
        )),
        JUSTIFY_CONTENT => Box::new(KeywordUtility::new(
            descriptor,
            &options,
            "justify",
            keyword::JUSTIFY_CONTENT_VALUES,
        )),
        other => return Err(ConfigurationError::UnknownPlugin(other.to_string())),
    };
    Ok(plugin)
}

pub fn default_registry() -> Result<PluginRegistry, ConfigurationError> {
    registry_from_config(&Config::default())
}

/// Built-ins without a `[[plugins]]` entry register first, in table order.
/// Every enabled entry follows in declaration order, so equal
/// priority/index ties resolve the way the config lists them.
pub fn registry_from_config(config: &Config) -> Result<PluginRegistry, ConfigurationError> {
    crate::config::validate(config)?;
    let mut registry = PluginRegistry::new();

    for descriptor in builtin_descriptors() {
        let has_entry = config
            .plugins
            .iter()
            .any(|entry| entry.namespace == descriptor.namespace);
        if !has_entry {
            registry.register(builtin_plugin(descriptor)?)?;
        }
    }

    for entry in &config.plugins {
        let plugin: Box<dyn UtilityPlugin> = match builtin_descriptor(&entry.namespace) {
            Some(descriptor) => {
                if entry.rules.is_some() {
                    return Err(ConfigurationError::InvalidOptions {
                        namespace: entry.namespace.clone(),
                        message: "built-in utilities do not accept rules".to_string(),
                    });
                }
                if !entry.enabled {
                    tracing::debug!(namespace = %entry.namespace, "built-in utility disabled");
                    continue;
                }
                builtin_plugin(apply_entry(descriptor, entry))?
            }
            None => {
                let Some(rules) = entry.rules.as_ref() else {
                    return Err(ConfigurationError::UnknownPlugin(entry.namespace.clone()));
                };
                if !entry.enabled {
                    continue;
                }
                let descriptor =
                    PluginDescriptor::new(entry.namespace.clone(), entry.namespace.clone())
                        .with_priority(GenerationPriority::After);
                Box::new(StaticRulesPlugin::new(
                    apply_entry(descriptor, entry),
                    rules.clone(),
                ))
            }
        };
        registry.register(plugin)?;
    }

    Ok(registry)
}

fn builtin_descriptor(namespace: &str) -> Option<PluginDescriptor> {
    builtin_descriptors()
        .into_iter()
        .find(|descriptor| descriptor.namespace == namespace)
}

fn apply_entry(mut descriptor: PluginDescriptor, entry: &PluginEntry) -> PluginDescriptor {
    if let Some(name) = entry.name.as_ref() {
        descriptor.name = name.clone();
    }
    if let Some(description) = entry.description.as_ref() {
        descriptor.description = description.clone();
    }
    if let Some(priority) = entry.priority {
        descriptor.priority = priority;
    }
    if let Some(index) = entry.index {
        descriptor.index = index;
    }
    if entry.options.is_some() {
        descriptor.options = entry.options.clone();
    }
    descriptor
}

fn class_name_for(
    theme: &Theme,
    tag: &str,
    key: &str,
    is_default_key: bool,
) -> Result<String, PluginError> {
    let class_name = generate_class_name(Some(tag), key, is_default_key);
    if class_name.is_empty() {
        return Err(PluginError::new(format!(
            "key '{}' produces an empty class name without a class tag",
            key
        )));
    }
    Ok(add_custom_prefix(&class_name, &theme.prefix))
}

fn emit(
    theme: &Theme,
    bag: &mut RuleBag,
    class_name: &str,
    properties: PropertyMap,
    with_modifiers: bool,
) {
    if !with_modifiers {
        bag.set(class_selector(class_name), properties);
        return;
    }
    bag.set(class_selector(class_name), properties.clone());
    for (modifier, template) in &theme.modifiers {
        let variant = generate_class_name(Some(modifier.as_str()), class_name, false);
        bag.set(
            expand_modifier_template(template, &class_selector(&variant)),
            properties.clone(),
        );
    }
}
