use std::env;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_LLM_API_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "claude-3-5-sonnet-20241022";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: String,
    pub max_file_size_mb: usize,
    pub max_upload_size_mb: usize,
    pub max_text_length: usize,
    pub llm: LlmConfig,
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| {
                info!("SERVER_HOST not set, using default: 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            server_port: Self::parse_env_var("BACKEND_PORT", 3001)
                .context("Failed to parse BACKEND_PORT")?,
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| {
                info!("FRONTEND_URL not set, using default: http://localhost:3000");
                "http://localhost:3000".to_string()
            }),
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", 50)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_upload_size_mb: Self::parse_env_var("MAX_UPLOAD_SIZE_MB", 200)
                .context("Failed to parse MAX_UPLOAD_SIZE_MB")?,
            max_text_length: Self::parse_env_var("MAX_TEXT_LENGTH", 10_000)
                .context("Failed to parse MAX_TEXT_LENGTH")?,
            llm: LlmConfig::from_env()?,
        };

        config.validate()?;

        if config.llm.api_key.is_none() {
            warn!("No language model API key configured. Set CLAUDE_API_KEY to enable PDF to DOC conversion.");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("BACKEND_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_upload_size_mb < self.max_file_size_mb {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be at least MAX_FILE_SIZE_MB"));
        }
        if self.max_text_length == 0 {
            return Err(anyhow::anyhow!("MAX_TEXT_LENGTH must be greater than 0"));
        }
        if self.llm.max_tokens == 0 {
            return Err(anyhow::anyhow!("CLAUDE_MAX_TOKENS must be greater than 0"));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("LLM_TIMEOUT_SECONDS must be greater than 0"));
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Body limit for multipart requests: the file limit plus room for
    /// boundaries and part headers.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_file_size_bytes() + 1024 * 1024
    }

    /// Body limit for the multi-file upload form. Individual files over the
    /// file limit are skipped there, so only the whole request is capped.
    pub fn upload_body_limit_bytes(&self) -> usize {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl LlmConfig {
    fn from_env() -> Result<Self> {
        let api_key = env::var("CLAUDE_API_KEY")
            .or_else(|_| env::var("ANTHROPIC_API_KEY"))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(LlmConfig {
            api_key,
            api_url: env::var("CLAUDE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_LLM_API_URL.to_string()),
            model: env::var("CLAUDE_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            max_tokens: Config::parse_env_var("CLAUDE_MAX_TOKENS", 4000)
                .context("Failed to parse CLAUDE_MAX_TOKENS")?,
            timeout_seconds: Config::parse_env_var("LLM_TIMEOUT_SECONDS", 120)
                .context("Failed to parse LLM_TIMEOUT_SECONDS")?,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3001,
            frontend_url: "http://localhost:3000".to_string(),
            max_file_size_mb: 50,
            max_upload_size_mb: 200,
            max_text_length: 10_000,
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: 4000,
            timeout_seconds: 120,
        }
    }
}

// Keeps the API key out of logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
