pub const SEPARATOR: &str = "-";
pub const DEFAULT_KEY: &str = "DEFAULT";

pub fn is_default_key(key: &str) -> bool {
    key == DEFAULT_KEY
}

pub fn generate_class_name(class_tag: Option<&str>, key: &str, is_default_key: bool) -> String {
    if is_default_key {
        return class_tag.unwrap_or_default().to_string();
    }
    match class_tag {
        Some(tag) if !tag.is_empty() => format!("{}{}{}", tag, SEPARATOR, key),
        _ => key.to_string(),
    }
}

pub fn add_custom_prefix(class_tag: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return class_tag.to_string();
    }
    if class_tag.is_empty() {
        return prefix.to_string();
    }
    format!("{}{}", prefix, class_tag)
}

pub fn class_selector(class_name: &str) -> String {
    format!(".{}", class_name)
}
