use indexmap::IndexMap;

pub type PropertyMap = IndexMap<String, String>;

pub fn property_map<K, V, I>(declarations: I) -> PropertyMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    declarations
        .into_iter()
        .map(|(property, value)| (property.into(), value.into()))
        .collect()
}

/// Selector to declarations, in the order rules will be emitted.
///
/// Setting a selector that already exists replaces its declarations wholesale
/// and keeps the slot it was first inserted at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBag {
    rules: IndexMap<String, PropertyMap>,
}

impl RuleBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, selector: impl Into<String>, properties: PropertyMap) -> Option<PropertyMap> {
        self.rules.insert(selector.into(), properties)
    }

    pub fn get(&self, selector: &str) -> Option<&PropertyMap> {
        self.rules.get(selector)
    }

    pub fn contains(&self, selector: &str) -> bool {
        self.rules.contains_key(selector)
    }

    pub fn merge(&mut self, other: RuleBag) {
        for (selector, properties) in other.rules {
            self.set(selector, properties);
        }
    }

    pub fn remove(&mut self, selector: &str) -> Option<PropertyMap> {
        self.rules.shift_remove(selector)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyMap)> {
        self.rules
            .iter()
            .map(|(selector, properties)| (selector.as_str(), properties))
    }

    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<(String, PropertyMap)> for RuleBag {
    fn from_iter<I: IntoIterator<Item = (String, PropertyMap)>>(iter: I) -> Self {
        let mut bag = RuleBag::new();
        for (selector, properties) in iter {
            bag.set(selector, properties);
        }
        bag
    }
}
