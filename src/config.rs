use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听地址
    pub server_host: String,
    /// 监听端口
    pub server_port: u16,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 未指定时的默认题目数量
    pub default_question_count: usize,
    /// 单次请求允许的最大题目数量
    pub max_question_count: usize,
    /// 清洗后文本的最小长度
    pub min_text_length: usize,
    /// 本地生成的题目下限，低于此数返回“内容不足”
    pub min_question_floor: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次 LLM 调用超时（秒）
    pub llm_timeout_secs: u64,
    /// LLM 调用最大尝试次数
    pub llm_max_retries: u32,
    /// 两次尝试之间的等待（毫秒）
    pub llm_retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
            default_question_count: 10,
            max_question_count: 50,
            min_text_length: 150,
            min_question_floor: 3,
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_timeout_secs: 45,
            llm_max_retries: 2,
            llm_retry_delay_ms: 2000,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or(default.server_host),
            server_port: env_parse("SERVER_PORT").unwrap_or(default.server_port),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(default.max_upload_bytes),
            default_question_count: env_parse("DEFAULT_QUESTION_COUNT").unwrap_or(default.default_question_count),
            max_question_count: env_parse("MAX_QUESTION_COUNT").unwrap_or(default.max_question_count),
            min_text_length: env_parse("MIN_TEXT_LENGTH").unwrap_or(default.min_text_length),
            min_question_floor: env_parse("MIN_QUESTION_FLOOR").unwrap_or(default.min_question_floor),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_timeout_secs: env_parse("LLM_TIMEOUT_SECS").unwrap_or(default.llm_timeout_secs),
            llm_max_retries: env_parse("LLM_MAX_RETRIES").unwrap_or(default.llm_max_retries),
            llm_retry_delay_ms: env_parse("LLM_RETRY_DELAY_MS").unwrap_or(default.llm_retry_delay_ms),
        }
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
            .into()
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 优先读取 `QUIZ_CONFIG_FILE` 指向的文件，否则使用环境变量
    pub fn load() -> AppResult<Self> {
        match std::env::var("QUIZ_CONFIG_FILE") {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(path.trim())),
            _ => Ok(Self::from_env()),
        }
    }

    /// 是否启用远程生成
    pub fn llm_enabled(&self) -> bool {
        !self.llm_api_key.trim().is_empty()
    }

    /// 把请求的题目数量规整到 `1..=max_question_count`
    pub fn clamp_question_count(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_question_count)
            .clamp(1, self.max_question_count.max(1))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_partial_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            server_port = 9100
            llm_api_key = "sk-test"
            "#,
        )
        .unwrap();
        assert_eq!(config.server_port, 9100);
        assert!(config.llm_enabled());
        assert_eq!(config.min_text_length, 150);
        assert_eq!(config.llm_max_retries, 2);
    }

    #[test]
    fn test_toml_parse_error() {
        assert!(Config::from_toml_str("server_port = \"abc\"").is_err());
    }

    #[test]
    fn test_clamp_question_count() {
        let config = Config::default();
        assert_eq!(config.clamp_question_count(None), 10);
        assert_eq!(config.clamp_question_count(Some(0)), 1);
        assert_eq!(config.clamp_question_count(Some(500)), 50);
        assert_eq!(config.clamp_question_count(Some(15)), 15);
    }

    #[test]
    fn test_llm_disabled_by_default() {
        assert!(!Config::default().llm_enabled());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_toml_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
