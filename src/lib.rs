pub mod cli;
pub mod config;
pub mod defaults;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod generator;
pub mod naming;
pub mod plugin;
pub mod purge;
pub mod rule_bag;
pub mod scanner;
pub mod utilities;

pub use cli::{CliError, run_from_env};
pub use config::{Config, Theme};
pub use engine::{Generation, generate};
pub use error::{
    ConfigurationError, ContentReadError, GenerationError, InvalidSelectorWarning, MergeError,
    PluginError,
};
pub use generator::{OutputStyle, Stylesheet};
pub use plugin::{
    ClassExtractor, GenerationPriority, PluginDescriptor, PluginRegistry, UtilityPlugin,
};
pub use purge::{PurgeEngine, PurgeOutcome, PurgeState};
pub use rule_bag::{PropertyMap, RuleBag};
pub use scanner::{ContentSource, FsContentSource, MemoryContentSource, UsedClasses};

use generator::merge_custom_with_generated;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub generation: Generation,
    pub generated: Stylesheet,
    /// Present when a custom stylesheet was supplied. A merge failure leaves
    /// `generated` usable.
    pub merged: Option<Result<String, MergeError>>,
    pub removed: Vec<String>,
    pub unreadable: Vec<ContentReadError>,
    pub warnings: Vec<InvalidSelectorWarning>,
}

impl BuildOutput {
    /// The stylesheet to write: the merged text when a custom stylesheet was
    /// given, otherwise the generated rules alone.
    pub fn stylesheet(&self) -> Result<String, MergeError> {
        match &self.merged {
            Some(merged) => merged.clone(),
            None => Ok(self.generated.to_string()),
        }
    }
}

/// Generate, optionally purge against `config.content`, serialize, and merge
/// into `custom_text`.
pub fn build<S: ContentSource + ?Sized>(
    config: &Config,
    registry: &PluginRegistry,
    source: &S,
    custom_text: Option<&str>,
) -> Result<BuildOutput, GenerationError> {
    let mut generation = generate(&config.theme, registry)?;
    let generated_rules = generation.len();
    let mut removed = Vec::new();
    let mut unreadable = Vec::new();
    let mut warnings = Vec::new();

    if config.purge {
        if config.content.is_empty() {
            tracing::warn!(
                "purge enabled without content patterns; every class rule will be removed"
            );
        }
        let outcome =
            PurgeEngine::new(registry, &config.theme, source).purge(generation, &config.content);
        generation = outcome.generation;
        removed = outcome.removed;
        unreadable = outcome.unreadable;
        warnings = outcome.warnings;
    }

    let style = if config.minify {
        OutputStyle::Minified
    } else {
        OutputStyle::Expanded
    };
    let generated = generation.render(style);
    let merged = custom_text
        .map(|custom| merge_custom_with_generated(custom, &generated, &config.marker));

    tracing::info!(
        plugins = registry.len(),
        generated = generated_rules,
        kept = generation.len(),
        removed = removed.len(),
        unreadable = unreadable.len(),
        "stylesheet built"
    );

    Ok(BuildOutput {
        generation,
        generated,
        merged,
        removed,
        unreadable,
        warnings,
    })
}
