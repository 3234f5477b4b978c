use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter, Keys};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

pub const CLASS_PLACEHOLDER: &str = "{class}";

pub type SpacingScale = ValueDictionary<String, String>;
pub type ColorShades = ValueDictionary<String, String>;
pub type ColorPalette = ValueDictionary<String, ColorShades>;
pub type ModifierMap = ValueDictionary<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(
        serialize = "K: Serialize + Hash + Eq, V: Serialize",
        deserialize = "K: Deserialize<'de> + Hash + Eq, V: Deserialize<'de>"
    )
)]
pub struct ValueDictionary<K, V> {
    entries: IndexMap<K, V>,
}

impl<K: Hash + Eq, V> ValueDictionary<K, V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Replacing a key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ValueDictionary<String, String> {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }
}

impl<K: Hash + Eq, V> Default for ValueDictionary<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ValueDictionary<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(left, right)| left == right)
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ValueDictionary<K, V> {}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for ValueDictionary<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for ValueDictionary<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a ValueDictionary<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

pub fn expand_modifier_template(template: &str, selector: &str) -> String {
    if template.contains(CLASS_PLACEHOLDER) {
        template.replace(CLASS_PLACEHOLDER, selector)
    } else {
        format!("{}{}", selector, template)
    }
}
