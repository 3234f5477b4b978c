use crate::error::MergeError;
use crate::rule_bag::{PropertyMap, RuleBag};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    #[default]
    Expanded,
    Minified,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet(String);

impl Stylesheet {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Stylesheet {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<String> for Stylesheet {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<Stylesheet> for String {
    fn from(value: Stylesheet) -> Self {
        value.0
    }
}

pub fn generate_rule_text(selector: &str, properties: &PropertyMap) -> String {
    let mut rule = String::with_capacity(selector.len() + properties.len() * 24 + 4);
    rule.push_str(selector);
    rule.push_str(" {\n");
    for (property, value) in properties {
        rule.push_str("  ");
        rule.push_str(property);
        rule.push_str(": ");
        rule.push_str(value);
        rule.push_str(";\n");
    }
    rule.push_str("}\n");
    rule
}

pub fn generate_stylesheet_text(bag: &RuleBag) -> String {
    bag.iter()
        .map(|(selector, properties)| generate_rule_text(selector, properties))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn minify_rule_text(selector: &str, properties: &PropertyMap) -> String {
    let mut rule = String::with_capacity(selector.len() + properties.len() * 16 + 2);
    rule.push_str(selector);
    rule.push('{');
    for (property, value) in properties {
        rule.push_str(property);
        rule.push(':');
        rule.push_str(value);
        rule.push(';');
    }
    rule.push('}');
    rule
}

pub fn minify_stylesheet_text(bag: &RuleBag) -> String {
    bag.iter()
        .map(|(selector, properties)| minify_rule_text(selector, properties))
        .collect()
}

pub fn render(bag: &RuleBag, style: OutputStyle) -> Stylesheet {
    let text = match style {
        OutputStyle::Expanded => generate_stylesheet_text(bag),
        OutputStyle::Minified => minify_stylesheet_text(bag),
    };
    Stylesheet::new(text)
}

/// Splices `generated` into `custom` at the single `marker`, or appends it
/// when the marker is absent. An empty marker never matches.
pub fn merge_custom_with_generated(
    custom: &str,
    generated: &str,
    marker: &str,
) -> Result<String, MergeError> {
    let occurrences = if marker.is_empty() {
        0
    } else {
        custom.matches(marker).count()
    };

    match occurrences {
        0 => Ok(format!("{}\n{}\n", custom, generated)),
        1 => Ok(custom.replacen(marker, generated, 1)),
        _ => Err(MergeError::MultipleMarkers {
            marker: marker.to_string(),
            occurrences,
        }),
    }
}
