use super::{UtilityOptions, class_name_for, emit};
use crate::config::Theme;
use crate::error::PluginError;
use crate::naming::{generate_class_name, is_default_key};
use crate::plugin::{PluginDescriptor, UtilityPlugin};
use crate::rule_bag::{RuleBag, property_map};

#[derive(Debug, Clone)]
pub struct ColorUtility {
    descriptor: PluginDescriptor,
    class_tag: String,
    property: &'static str,
    modifiers: bool,
}

impl ColorUtility {
    pub fn new(
        descriptor: PluginDescriptor,
        options: &UtilityOptions,
        class_tag: &str,
        property: &'static str,
    ) -> Self {
        Self {
            descriptor,
            class_tag: options.tag(class_tag).to_string(),
            property,
            modifiers: options.modifiers.unwrap_or(true),
        }
    }
}

impl UtilityPlugin for ColorUtility {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn populate(&self, theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError> {
        for (family, shades) in &theme.colors {
            for (shade, value) in shades {
                let key = generate_class_name(Some(family.as_str()), shade, is_default_key(shade));
                let class_name = class_name_for(theme, &self.class_tag, &key, false)?;
                emit(
                    theme,
                    bag,
                    &class_name,
                    property_map([(self.property, value.as_str())]),
                    self.modifiers,
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ColorUtility;
    use crate::config::Theme;
    use crate::dictionary::{ColorPalette, ColorShades, ModifierMap};
    use crate::plugin::{PluginDescriptor, UtilityPlugin};
    use crate::rule_bag::{RuleBag, property_map};
    use crate::utilities::UtilityOptions;

    fn theme() -> Theme {
        let mut colors = ColorPalette::new();
        colors.insert(
            "red".to_string(),
            ColorShades::from_pairs(&[("DEFAULT", "#ff0000"), ("500", "#ef4444")]),
        );
        Theme {
            colors,
            modifiers: ModifierMap::from_pairs(&[("hover", "{class}:hover")]),
            ..Theme::default()
        }
    }

    fn background(options: UtilityOptions) -> ColorUtility {
        ColorUtility::new(
            PluginDescriptor::new("com.test.bg", "bg"),
            &options,
            "bg",
            "background-color",
        )
    }

    #[test]
    fn emits_family_shades_and_default_collapse() {
        let mut bag = RuleBag::new();
        background(UtilityOptions::default())
            .populate(&theme(), &mut bag)
            .expect("populate should succeed");

        assert_eq!(
            bag.selectors().collect::<Vec<_>>(),
            vec![".bg-red", ".hover-bg-red:hover", ".bg-red-500", ".hover-bg-red-500:hover"]
        );
        assert_eq!(
            bag.get(".bg-red-500"),
            Some(&property_map([("background-color", "#ef4444")]))
        );
        assert_eq!(bag.get(".hover-bg-red-500:hover"), bag.get(".bg-red-500"));
    }

    #[test]
    fn honors_prefix_tag_override_and_disabled_modifiers() {
        let theme = Theme {
            prefix: "ui-".to_string(),
            ..theme()
        };
        let options = UtilityOptions {
            class_tag: Some("fill".to_string()),
            modifiers: Some(false),
        };
        let mut bag = RuleBag::new();
        background(options)
            .populate(&theme, &mut bag)
            .expect("populate should succeed");
        assert_eq!(
            bag.selectors().collect::<Vec<_>>(),
            vec![".ui-fill-red", ".ui-fill-red-500"]
        );
    }
}
