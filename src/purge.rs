use crate::config::Theme;
use crate::engine::Generation;
use crate::error::{ContentReadError, InvalidSelectorWarning};
use crate::plugin::{ClassExtractor, PluginRegistry};
use crate::scanner::{ContentSource, DefaultExtractor, UsedClasses, expand_patterns};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

const COMBINATORS: [char; 5] = ['>', '+', '~', ',', '['];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PurgeState {
    #[default]
    Idle,
    Scanning,
    Matching,
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub generation: Generation,
    pub removed: Vec<String>,
    pub unreadable: Vec<ContentReadError>,
    pub warnings: Vec<InvalidSelectorWarning>,
}

/// Drops rules whose class never appears in the scanned content.
pub struct PurgeEngine<'a, S: ContentSource + ?Sized> {
    registry: &'a PluginRegistry,
    theme: &'a Theme,
    source: &'a S,
    state: PurgeState,
}

impl<'a, S: ContentSource + ?Sized> PurgeEngine<'a, S> {
    pub fn new(registry: &'a PluginRegistry, theme: &'a Theme, source: &'a S) -> Self {
        Self {
            registry,
            theme,
            source,
            state: PurgeState::Idle,
        }
    }

    pub fn state(&self) -> PurgeState {
        self.state
    }

    pub fn purge(&mut self, mut generation: Generation, patterns: &[String]) -> PurgeOutcome {
        self.transition(PurgeState::Scanning);
        let default_extractor = DefaultExtractor;
        let mut extractors: Vec<&dyn ClassExtractor> = vec![&default_extractor];
        let mut extractor_slots = HashMap::new();
        for plugin in self.registry.iter() {
            if let Some(extractor) = plugin.class_extractor() {
                extractor_slots.insert(plugin.namespace(), extractors.len());
                extractors.push(extractor);
            }
        }

        let (paths, mut unreadable) = expand_patterns(self.source, patterns);
        let (used, failures) = scan_paths(self.source, &paths, &extractors);
        unreadable.extend(failures);
        unreadable.sort_by(|left, right| left.path.cmp(&right.path));
        for failure in &unreadable {
            tracing::warn!(
                path = %failure.path.display(),
                error = %failure.message,
                "content not readable; skipped"
            );
        }
        tracing::debug!(
            files = paths.len(),
            classes = used[0].len(),
            "content scanned"
        );

        self.transition(PurgeState::Matching);
        let mut removed = Vec::new();
        let mut warnings = Vec::new();
        for selector in generation.bag().selectors() {
            let class = match bare_class(selector) {
                Ok(class) => class,
                Err(reason) => {
                    tracing::warn!(
                        selector,
                        reason = reason.as_str(),
                        "selector kept without matching"
                    );
                    warnings.push(InvalidSelectorWarning {
                        selector: selector.to_string(),
                        reason,
                    });
                    continue;
                }
            };
            let owner_set = generation
                .owner(selector)
                .and_then(|owner| extractor_slots.get(owner))
                .map(|slot| &used[*slot]);
            let referenced =
                used[0].matches(class) || owner_set.is_some_and(|set| set.matches(class));
            if !referenced {
                removed.push(selector.to_string());
            }
        }
        for selector in &removed {
            generation.remove(selector);
        }

        self.transition(PurgeState::Complete);
        for plugin in self.registry.execution_order() {
            plugin.on_purge_complete(self.theme, generation.bag());
        }
        tracing::debug!(
            removed = removed.len(),
            kept = generation.len(),
            "purge complete"
        );

        PurgeOutcome {
            generation,
            removed,
            unreadable,
            warnings,
        }
    }

    fn transition(&mut self, next: PurgeState) {
        tracing::debug!(from = ?self.state, to = ?next, "purge state");
        self.state = next;
    }
}

fn scan_paths<S: ContentSource + ?Sized>(
    source: &S,
    paths: &[PathBuf],
    extractors: &[&dyn ClassExtractor],
) -> (Vec<UsedClasses>, Vec<ContentReadError>) {
    let empty = || (vec![UsedClasses::new(); extractors.len()], Vec::new());
    paths
        .par_iter()
        .fold(empty, |(mut used, mut failures), path| {
            match source.read_text(path) {
                Ok(text) => {
                    for (set, extractor) in used.iter_mut().zip(extractors) {
                        set.extend(extractor.extract(&text));
                    }
                }
                Err(err) => failures.push(ContentReadError {
                    path: path.clone(),
                    message: err.to_string(),
                }),
            }
            (used, failures)
        })
        .reduce(empty, |(mut used, mut failures), (other, other_failures)| {
            for (set, other) in used.iter_mut().zip(other) {
                set.extend(other);
            }
            failures.extend(other_failures);
            (used, failures)
        })
}

/// `.hover-bg-red:hover` -> `hover-bg-red`.
fn bare_class(selector: &str) -> Result<&str, String> {
    let Some(rest) = selector.strip_prefix('.') else {
        return Err("not a class selector".to_string());
    };
    if rest.chars().any(char::is_whitespace) || rest.contains(COMBINATORS) {
        return Err("contains a combinator".to_string());
    }
    let class = rest.split(':').next().unwrap_or_default();
    if class.is_empty() {
        return Err("empty class name".to_string());
    }
    if class.contains('.') {
        return Err("compound class selector".to_string());
    }
    Ok(class)
}
