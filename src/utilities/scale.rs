use super::{UtilityOptions, class_name_for, emit};
use crate::config::Theme;
use crate::dictionary::ValueDictionary;
use crate::error::PluginError;
use crate::naming::is_default_key;
use crate::plugin::{PluginDescriptor, UtilityPlugin};
use crate::rule_bag::{PropertyMap, RuleBag};

type ScaleLookup = fn(&Theme) -> &ValueDictionary<String, String>;

const SIDES: [(&str, &[&str]); 7] = [
    ("", &[""]),
    ("x", &["-left", "-right"]),
    ("y", &["-top", "-bottom"]),
    ("t", &["-top"]),
    ("r", &["-right"]),
    ("b", &["-bottom"]),
    ("l", &["-left"]),
];

#[derive(Debug, Clone)]
struct Family {
    class_tag: String,
    properties: Vec<String>,
}

/// Expands one theme scale into rules for one or more class tags.
#[derive(Clone)]
pub struct ScaleUtility {
    descriptor: PluginDescriptor,
    families: Vec<Family>,
    scale: ScaleLookup,
    modifiers: bool,
}

impl ScaleUtility {
    pub fn single(
        descriptor: PluginDescriptor,
        options: &UtilityOptions,
        class_tag: &str,
        property: &str,
        scale: ScaleLookup,
    ) -> Self {
        Self {
            descriptor,
            families: vec![Family {
                class_tag: options.tag(class_tag).to_string(),
                properties: vec![property.to_string()],
            }],
            scale,
            modifiers: options.modifiers.unwrap_or(false),
        }
    }

    /// `p`, `px`, `py`, `pt`, `pr`, `pb`, `pl` style families over the spacing scale.
    pub fn sided(
        descriptor: PluginDescriptor,
        options: &UtilityOptions,
        class_tag: &str,
        property: &str,
    ) -> Self {
        let base = options.tag(class_tag);
        let families = SIDES
            .iter()
            .map(|(suffix, sides)| Family {
                class_tag: format!("{}{}", base, suffix),
                properties: sides
                    .iter()
                    .map(|side| format!("{}{}", property, side))
                    .collect(),
            })
            .collect();
        Self {
            descriptor,
            families,
            scale: |theme| &theme.spacing,
            modifiers: options.modifiers.unwrap_or(false),
        }
    }
}

impl UtilityPlugin for ScaleUtility {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn populate(&self, theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError> {
        let scale = (self.scale)(theme);
        for family in &self.families {
            for (key, value) in scale {
                let class_name =
                    class_name_for(theme, &family.class_tag, key, is_default_key(key))?;
                let properties = family
                    .properties
                    .iter()
                    .map(|property| (property.clone(), value.clone()))
                    .collect::<PropertyMap>();
                emit(theme, bag, &class_name, properties, self.modifiers);
            }
        }
        Ok(())
    }
}
