use super::{UtilityOptions, class_name_for, emit};
use crate::config::Theme;
use crate::error::PluginError;
use crate::plugin::{PluginDescriptor, UtilityPlugin};
use crate::rule_bag::{RuleBag, property_map};

pub type KeywordTable = &'static [(&'static str, &'static [(&'static str, &'static str)])];

pub const DISPLAY_VALUES: KeywordTable = &[
    ("flex", &[("display", "flex")]),
    ("hidden", &[("display", "none")]),
];

pub const FLEX_VALUES: KeywordTable = &[
    ("row", &[("flex-direction", "row")]),
    ("row-reverse", &[("flex-direction", "row-reverse")]),
    ("col", &[("flex-direction", "column")]),
    ("col-reverse", &[("flex-direction", "column-reverse")]),
    ("wrap", &[("flex-wrap", "wrap")]),
    ("wrap-reverse", &[("flex-wrap", "wrap-reverse")]),
    ("nowrap", &[("flex-wrap", "nowrap")]),
    ("1", &[("flex-grow", "1"), ("flex-shrink", "1"), ("flex-basis", "0%")]),
    ("auto", &[("flex-grow", "1"), ("flex-shrink", "1"), ("flex-basis", "auto")]),
    ("none", &[("flex-grow", "0"), ("flex-shrink", "0"), ("flex-basis", "auto")]),
    ("grow", &[("flex-grow", "1")]),
    ("grow-0", &[("flex-grow", "0")]),
    ("shrink", &[("flex-shrink", "1")]),
    ("shrink-0", &[("flex-shrink", "0")]),
];

pub const ALIGN_ITEMS_VALUES: KeywordTable = &[
    ("start", &[("align-items", "flex-start")]),
    ("end", &[("align-items", "flex-end")]),
    ("center", &[("align-items", "center")]),
    ("stretch", &[("align-items", "stretch")]),
];

pub const JUSTIFY_CONTENT_VALUES: KeywordTable = &[
    ("start", &[("justify-content", "flex-start")]),
    ("end", &[("justify-content", "flex-end")]),
    ("center", &[("justify-content", "center")]),
    ("between", &[("justify-content", "space-between")]),
    ("around", &[("justify-content", "space-around")]),
];

#[derive(Debug, Clone)]
pub struct KeywordUtility {
    descriptor: PluginDescriptor,
    class_tag: String,
    values: KeywordTable,
    modifiers: bool,
}

impl KeywordUtility {
    pub fn new(
        descriptor: PluginDescriptor,
        options: &UtilityOptions,
        class_tag: &str,
        values: KeywordTable,
    ) -> Self {
        Self {
            descriptor,
            class_tag: options.tag(class_tag).to_string(),
            values,
            modifiers: options.modifiers.unwrap_or(false),
        }
    }
}

impl UtilityPlugin for KeywordUtility {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn populate(&self, theme: &Theme, bag: &mut RuleBag) -> Result<(), PluginError> {
        for (key, declarations) in self.values {
            let class_name = class_name_for(theme, &self.class_tag, key, false)?;
            emit(
                theme,
                bag,
                &class_name,
                property_map(declarations.iter().copied()),
                self.modifiers,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DISPLAY_VALUES, FLEX_VALUES, KeywordUtility};
    use crate::config::Theme;
    use crate::plugin::{PluginDescriptor, UtilityPlugin};
    use crate::rule_bag::{RuleBag, property_map};
    use crate::utilities::UtilityOptions;

    #[test]
    fn tagless_keywords_use_bare_key() {
        let plugin = KeywordUtility::new(
            PluginDescriptor::new("com.test.display", "display"),
            &UtilityOptions::default(),
            "",
            DISPLAY_VALUES,
        );
        let mut bag = RuleBag::new();
        plugin.populate(&Theme::default(), &mut bag).expect("populate");
        assert_eq!(bag.selectors().collect::<Vec<_>>(), vec![".flex", ".hidden"]);
        assert_eq!(bag.get(".hidden"), Some(&property_map([("display", "none")])));
    }

    #[test]
    fn tagged_keywords_join_with_separator() {
        let plugin = KeywordUtility::new(
            PluginDescriptor::new("com.test.flex", "flex"),
            &UtilityOptions::default(),
            "flex",
            FLEX_VALUES,
        );
        let mut bag = RuleBag::new();
        plugin.populate(&Theme::default(), &mut bag).expect("populate");
        assert!(bag.contains(".flex-none"));
        assert_eq!(
            bag.get(".flex-col"),
            Some(&property_map([("flex-direction", "column")]))
        );
    }

    #[test]
    fn prefix_applies_to_tagless_keywords() {
        let theme = Theme {
            prefix: "ui-".to_string(),
            ..Theme::default()
        };
        let plugin = KeywordUtility::new(
            PluginDescriptor::new("com.test.display", "display"),
            &UtilityOptions::default(),
            "",
            DISPLAY_VALUES,
        );
        let mut bag = RuleBag::new();
        plugin.populate(&theme, &mut bag).expect("populate");
        assert_eq!(bag.selectors().collect::<Vec<_>>(), vec![".ui-flex", ".ui-hidden"]);
    }
}
