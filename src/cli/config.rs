//! Configuration management for rfpbuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.rfpbuddy/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{RfpError, Result};
use crate::types::{Mode, Provider};

/// Default local completion endpoint
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Default cloud API base
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Complete configuration for rfpbuddy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Provider used when `--provider` is not given
    pub model_provider: Provider,
    pub retrieval: RetrievalConfig,
    pub ollama: OllamaConfig,
    pub cloud: CloudConfig,
    pub vector_store: VectorStoreConfig,
    pub agent: AgentConfig,
    pub paths: PathsConfig,
}

/// Per-mode retrieval budgets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k_excel: usize,
    pub top_k_pdf: usize,
    pub max_context_excel: usize,
    pub max_context_pdf: usize,
}

/// Local model server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OllamaConfig {
    pub endpoint: String,
    pub excel_model: String,
    pub pdf_model: String,
    pub timeout_secs: u64,
}

/// Cloud API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudConfig {
    pub endpoint: String,
    pub excel_model: String,
    pub pdf_model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

/// Vector store connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub url: String,
    pub collection: String,
}

/// Orchestrator behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Extra attempts after the first one
    pub retries: u32,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub inputs_dir: String,
    pub outputs_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_provider: Provider::Local,
            retrieval: RetrievalConfig::default(),
            ollama: OllamaConfig::default(),
            cloud: CloudConfig::default(),
            vector_store: VectorStoreConfig::default(),
            agent: AgentConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k_excel: 1,
            top_k_pdf: 3,
            max_context_excel: 800,
            max_context_pdf: 2000,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            excel_model: "gemma:2b".to_string(),
            pdf_model: "llama3:8b-instruct-q4_K_M".to_string(),
            timeout_secs: 400,
        }
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            excel_model: "gemini-1.5-flash".to_string(),
            pdf_model: "gemini-1.5-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 400,
        }
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "knowledge_base".to_string(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { retries: 2 }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            inputs_dir: "rfp_inputs".to_string(),
            outputs_dir: "rfp_outputs".to_string(),
        }
    }
}

impl RetrievalConfig {
    /// Number of chunks to retrieve for a mode
    pub fn top_k(&self, mode: Mode) -> usize {
        if mode.is_compliance() {
            self.top_k_excel
        } else {
            self.top_k_pdf
        }
    }

    /// Character budget for a mode
    pub fn max_context(&self, mode: Mode) -> usize {
        if mode.is_compliance() {
            self.max_context_excel
        } else {
            self.max_context_pdf
        }
    }
}

impl OllamaConfig {
    pub fn model_for(&self, mode: Mode) -> &str {
        if mode.is_compliance() {
            &self.excel_model
        } else {
            &self.pdf_model
        }
    }
}

impl CloudConfig {
    pub fn model_for(&self, mode: Mode) -> &str {
        if mode.is_compliance() {
            &self.excel_model
        } else {
            &self.pdf_model
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RfpError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| RfpError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".rfpbuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let r = &self.retrieval;

        if r.top_k_excel == 0 || r.top_k_pdf == 0 {
            return Err(RfpError::ConfigError(
                "top_k_excel and top_k_pdf must be greater than 0".to_string(),
            ));
        }

        if r.max_context_excel < r.top_k_excel || r.max_context_pdf < r.top_k_pdf {
            return Err(RfpError::ConfigError(
                "max_context budgets must be at least top_k characters".to_string(),
            ));
        }

        if self.ollama.timeout_secs == 0 || self.cloud.timeout_secs == 0 {
            return Err(RfpError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        let models = [
            &self.ollama.excel_model,
            &self.ollama.pdf_model,
            &self.cloud.excel_model,
            &self.cloud.pdf_model,
        ];
        if models.iter().any(|m| m.trim().is_empty()) {
            return Err(RfpError::ConfigError("Model names must not be empty".to_string()));
        }

        if self.vector_store.collection.trim().is_empty() {
            return Err(RfpError::ConfigError(
                "vector_store.collection must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RfpError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RfpError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RfpError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn inputs_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.inputs_dir)
    }

    pub fn outputs_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.outputs_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model_provider, Provider::Local);
        assert_eq!(config.retrieval.top_k_excel, 1);
        assert_eq!(config.retrieval.top_k_pdf, 3);
        assert_eq!(config.retrieval.max_context_excel, 800);
        assert_eq!(config.retrieval.max_context_pdf, 2000);
        assert_eq!(config.ollama.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.ollama.timeout_secs, 400);
        assert_eq!(config.agent.retries, 2);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_top_k() {
        let mut config = Config::default();
        config.retrieval.top_k_pdf = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_budget_below_top_k() {
        let mut config = Config::default();
        config.retrieval.max_context_excel = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_model() {
        let mut config = Config::default();
        config.cloud.pdf_model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.cloud.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mode_selects_budget_and_model() {
        let config = Config::default();
        assert_eq!(config.retrieval.top_k(Mode::Compliance), 1);
        assert_eq!(config.retrieval.top_k(Mode::Answer), 3);
        assert_eq!(config.retrieval.max_context(Mode::Proposal), 2000);
        assert_eq!(config.ollama.model_for(Mode::Compliance), "gemma:2b");
        assert_eq!(config.cloud.model_for(Mode::Answer), "gemini-1.5-pro");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml(
            r#"
model_provider = "gemini"

[retrieval]
top_k_pdf = 5
"#,
        )
        .unwrap();

        assert_eq!(config.model_provider, Provider::Cloud);
        assert_eq!(config.retrieval.top_k_pdf, 5);
        assert_eq!(config.retrieval.top_k_excel, 1);
        assert_eq!(config.vector_store.collection, "knowledge_base");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(Config::from_toml("retrieval = 3").is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.agent.retries = 4;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_expand_path_without_tilde() {
        let expanded = Config::expand_path("/absolute/path");
        assert_eq!(expanded.to_string_lossy(), "/absolute/path");
    }
}
