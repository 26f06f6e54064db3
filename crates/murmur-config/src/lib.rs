use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "murmur";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_GRAPH_API_VERSION: &str = "v24.0";
pub const DEFAULT_COMMENT_LIMIT: u32 = 100;
pub const MAX_COMMENT_LIMIT: u32 = 500;
pub const DEFAULT_SUMMARIZER_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "finiteautomata/bertweet-base-sentiment-analysis";
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_TEXT_COLUMN: &str = "Comments";

pub const ENV_PAGE_ID: &str = "FB_PAGE_ID";
pub const ENV_ACCESS_TOKEN: &str = "FB_ACCESS_TOKEN";
pub const ENV_API_VERSION: &str = "FB_API_VERSION";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_HF_API_TOKEN: &str = "HF_API_TOKEN";

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub classifier: ClassifierConfig,
    pub summarizer: SummarizerConfig,
    pub import: ImportConfig,
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub page_id: Option<String>,
    pub access_token: Option<String>,
    pub api_version: String,
    pub comment_limit: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            page_id: None,
            access_token: None,
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphCredentials {
    pub page_id: String,
    pub access_token: String,
}

impl GraphConfig {
    pub fn credentials(&self) -> Result<GraphCredentials> {
        let page_id = non_empty(self.page_id.as_deref())
            .ok_or(ConfigError::MissingCredential(ENV_PAGE_ID))?;
        let access_token = non_empty(self.access_token.as_deref())
            .ok_or(ConfigError::MissingCredential(ENV_ACCESS_TOKEN))?;
        Ok(GraphCredentials {
            page_id: page_id.to_string(),
            access_token: access_token.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    #[default]
    Lexicon,
    Remote,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub backend: ClassifierBackend,
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Lexicon,
            endpoint: DEFAULT_CLASSIFIER_ENDPOINT.to_string(),
            model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_SUMMARIZER_MODEL.to_string(),
        }
    }
}

impl SummarizerConfig {
    pub fn api_key(&self) -> Result<&str> {
        non_empty(self.api_key.as_deref()).ok_or(ConfigError::MissingCredential(ENV_GEMINI_API_KEY))
    }
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub text_column: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            text_column: DEFAULT_TEXT_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid comment_limit value: {0}")]
    InvalidCommentLimit(u32),
    #[error("invalid {field} value: cannot be empty")]
    EmptyField { field: &'static str },
    #[error("missing credential: set {0} or the matching config entry")]
    MissingCredential(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    graph: Option<GraphFile>,
    classifier: Option<ClassifierFile>,
    summarizer: Option<SummarizerFile>,
    import: Option<ImportFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphFile {
    page_id: Option<String>,
    access_token: Option<String>,
    api_version: Option<String>,
    comment_limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassifierFile {
    backend: Option<ClassifierBackend>,
    endpoint: Option<String>,
    model: Option<String>,
    api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SummarizerFile {
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    text_column: Option<String>,
}

/// Loads the config file (required when `config_path` is given) and applies
/// environment overrides on top.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config = load_file(config_path)?;
    Ok(apply_env(config, |key| env::var(key).ok()))
}

fn load_file(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(graph) = parsed.graph {
        config.graph.page_id = graph.page_id;
        config.graph.access_token = graph.access_token;
        if let Some(version) = graph.api_version {
            config.graph.api_version = required_field(version, "graph.api_version")?;
        }
        if let Some(limit) = graph.comment_limit {
            if limit == 0 || limit > MAX_COMMENT_LIMIT {
                return Err(ConfigError::InvalidCommentLimit(limit));
            }
            config.graph.comment_limit = limit;
        }
    }

    if let Some(classifier) = parsed.classifier {
        if let Some(backend) = classifier.backend {
            config.classifier.backend = backend;
        }
        if let Some(endpoint) = classifier.endpoint {
            config.classifier.endpoint = required_field(endpoint, "classifier.endpoint")?;
        }
        if let Some(model) = classifier.model {
            config.classifier.model = required_field(model, "classifier.model")?;
        }
        config.classifier.api_token = classifier.api_token;
    }

    if let Some(summarizer) = parsed.summarizer {
        config.summarizer.api_key = summarizer.api_key;
        if let Some(model) = summarizer.model {
            config.summarizer.model = required_field(model, "summarizer.model")?;
        }
    }

    if let Some(import) = parsed.import {
        if let Some(column) = import.text_column {
            config.import.text_column = required_field(column, "import.text_column")?;
        }
    }

    Ok(config)
}

fn apply_env<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(page_id) = lookup(ENV_PAGE_ID) {
        config.graph.page_id = Some(page_id);
    }
    if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
        config.graph.access_token = Some(token);
    }
    if let Some(version) = lookup(ENV_API_VERSION) {
        config.graph.api_version = version.trim().to_string();
    }
    if let Some(key) = lookup(ENV_GEMINI_API_KEY) {
        config.summarizer.api_key = Some(key);
    }
    if let Some(token) = lookup(ENV_HF_API_TOKEN) {
        config.classifier.api_token = Some(token);
    }
    config
}

fn required_field(value: String, field: &'static str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
