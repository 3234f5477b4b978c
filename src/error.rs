use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("invalid plugin namespace '{namespace}': {reason}")]
    InvalidNamespace { namespace: String, reason: String },
    #[error("plugin namespace '{0}' is registered more than once")]
    DuplicateNamespace(String),
    #[error("unknown plugin '{0}': not a built-in utility and no rules were declared")]
    UnknownPlugin(String),
    #[error("invalid options for plugin '{namespace}': {message}")]
    InvalidOptions { namespace: String, message: String },
    #[error("template marker must not be empty")]
    EmptyMarker,
    #[error("failed to read config {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
    #[error("failed to parse config {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PluginError {
    pub message: String,
}

impl PluginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("plugin '{namespace}' failed: {source}")]
    PluginExecution {
        namespace: String,
        #[source]
        source: PluginError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("template marker '{marker}' appears {occurrences} times in custom stylesheet; expected at most one")]
    MultipleMarkers { marker: String, occurrences: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to read content {}: {message}", .path.display())]
pub struct ContentReadError {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("selector '{selector}' kept without purge matching: {reason}")]
pub struct InvalidSelectorWarning {
    pub selector: String,
    pub reason: String,
}
