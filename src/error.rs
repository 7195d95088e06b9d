use thiserror::Error;

/// Errors that can occur while loading or resolving the integration catalog.
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("Could not read catalog file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse catalog JSON: {0}")]
    JsonParseError(String),

    #[error("Allow-list entry '{0}' is not a valid selector")]
    InvalidSelector(String),
}

/// A requested integration/resource/operation triple that the resolved catalog does not offer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("not such integration {integration}")]
    Integration { integration: String },

    #[error("not such resource {integration}->{resource}")]
    Resource { integration: String, resource: String },

    #[error("not such operation {integration}->{resource}->{operation}")]
    Operation {
        integration: String,
        resource: String,
        operation: String,
    },
}

/// Errors that can occur while loading the agent configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config YAML: {0}")]
    YamlParseError(String),
}

/// Errors that can occur while saving or loading a catalog snapshot.
#[derive(Error, Debug, Clone)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed for '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    #[error("Snapshot decoding failed: {0}")]
    Decode(String),

    #[error("Snapshot entry '{name}' holds an unreadable definition: {message}")]
    Definition { name: String, message: String },
}
