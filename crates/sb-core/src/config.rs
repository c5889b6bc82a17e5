//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. sheetbridge.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sheetbridge.toml";

/// Chat-completion model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    pub api_key: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Main configuration for sheetbridge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Workbook location
    #[serde(default)]
    pub workbook: WorkbookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bind address
    #[serde(default = "default_api_host")]
    pub host: String,

    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Allowed CORS origins; any origin is allowed when unset
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
            allowed_origins: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookConfig {
    /// Workbook every prompt-driven tool call is pointed at
    #[serde(default = "default_workbook_path")]
    pub default_path: String,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            default_path: default_workbook_path(),
        }
    }
}

fn default_api_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_workbook_path() -> String {
    "uploaded_file.xlsx".to_string()
}

impl Config {
    /// 設定ファイルから環境変数を展開する
    ///
    /// `${VAR_NAME}` 形式の文字列を環境変数の値に置換します。
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後、環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();
        cfg.validate()?;

        Ok(cfg)
    }

    fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);
        let toml: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        Ok(Self::from_toml_config(toml))
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./sheetbridge.toml` があればそれを使い、なければ環境変数のみ。
    pub fn load() -> crate::Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Self::from_env()
    }

    /// TOML 構造から Config を構築
    fn from_toml_config(toml: TomlConfig) -> Self {
        let llm = toml.llm.unwrap_or_default();
        let api = toml.api.unwrap_or_default();
        let workbook = toml.workbook.unwrap_or_default();

        Config {
            llm: LlmConfig {
                api_key: llm.api_key.unwrap_or_default(),
                model: llm.model.unwrap_or_else(default_model),
                base_url: llm.base_url.unwrap_or_else(default_base_url),
            },
            api: ApiConfig {
                host: api.host.unwrap_or_else(default_api_host),
                port: api.port.unwrap_or_else(default_api_port),
                allowed_origins: api.allowed_origins,
            },
            workbook: WorkbookConfig {
                default_path: workbook.default_path.unwrap_or_else(default_workbook_path),
            },
        }
    }

    /// 環境変数で設定を上書きする
    fn apply_env_overrides(&mut self) {
        if let Some(api_key) = env_api_key() {
            self.llm.api_key = api_key;
        }
        if let Some(model) = non_empty_env("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(base_url) = non_empty_env("LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }

        if let Some(host) = non_empty_env("API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = non_empty_env("API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(origins) = non_empty_env("API_ALLOWED_ORIGINS") {
            self.api.allowed_origins = Some(split_list(&origins));
        }

        if let Some(path) = non_empty_env("WORKBOOK_PATH") {
            self.workbook.default_path = path;
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Config::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.llm.api_key.is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY or LLM_API_KEY not set".to_string(),
            ));
        }
        Ok(())
    }

    /// Address the HTTP API binds to, e.g. `0.0.0.0:8000`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn env_api_key() -> Option<String> {
    non_empty_env("OPENAI_API_KEY").or_else(|| non_empty_env("LLM_API_KEY"))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    llm: Option<TomlLlmConfig>,
    api: Option<TomlApiConfig>,
    workbook: Option<TomlWorkbookConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlLlmConfig {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlWorkbookConfig {
    #[serde(default)]
    default_path: Option<String>,
}
