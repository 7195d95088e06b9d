use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// How the surrounding session runs.
///
/// In `Production` answers to human questions come from a replay cache, so the
/// dispatcher never prompts a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Refine,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// The integration catalog file.
    pub nodes_json_path: PathBuf,
    /// Ordered allow-list of `integration[.resource[.operation]]` selectors.
    #[serde(alias = "nodes_whtie_list")]
    pub nodes_white_list: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            nodes_json_path: PathBuf::from("./nodes.json"),
            nodes_white_list: Vec::new(),
        }
    }
}

/// Session configuration, built once and passed by reference to the catalog and
/// the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub parser: ParserConfig,
    pub environment: Environment,
    /// Depth below which optional composite parameters are collapsed in descriptions.
    pub description_max_depth: usize,
    /// Extra guidance appended to an integration's entry in the tool list.
    pub default_knowledge: IndexMap<String, String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            environment: Environment::default(),
            description_max_depth: 1,
            default_knowledge: IndexMap::new(),
        }
    }
}

impl AgentConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::YamlParseError(e.to_string()))
    }

    /// Loads a YAML config file. A relative catalog path is taken relative to the
    /// directory holding the config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_yaml_str(&text)?;
        if config.parser.nodes_json_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.parser.nodes_json_path = dir.join(&config.parser.nodes_json_path);
            }
        }
        Ok(config)
    }

    pub fn knowledge_for(&self, integration: &str) -> Option<&str> {
        self.default_knowledge.get(integration).map(String::as_str)
    }

    pub fn prompts_human(&self) -> bool {
        self.environment != Environment::Production
    }
}
