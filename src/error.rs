use thiserror::Error;

/// 应用程序错误类型
///
/// 按失败来源分组：调用方输入、PDF 提取、题目不足、远程生成、配置以及内部错误。
/// HTTP 状态码映射见 `api::response`。
#[derive(Debug, Error)]
pub enum AppError {
    /// 调用方输入错误（文件名、扩展名、参数 JSON、文本过短等）
    #[error("{0}")]
    Input(#[from] InputError),

    /// PDF 无法读取
    #[error("Could not process PDF: {reason}")]
    Extraction { reason: String },

    /// 可生成的题目数量低于下限
    #[error("Insufficient content: only {generated} question(s) could be generated, at least {required} required")]
    InsufficientContent { generated: usize, required: usize },

    /// 远程生成服务错误（一般只记录日志，由本地流水线兜底）
    #[error("Remote generation failed: {0}")]
    Remote(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 资源不存在
    #[error("{0} not found")]
    NotFound(String),

    /// 上传内容超过大小限制
    #[error("File too large: maximum upload size is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// 其他内部错误
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// 调用方输入错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("No filename provided")]
    MissingFilename,

    #[error("Only PDF files are allowed")]
    NotPdf { filename: String },

    #[error("No PDF file uploaded")]
    MissingFile,

    #[error("Invalid params JSON: {reason}")]
    MalformedParams { reason: String },

    #[error("Invalid request body: {reason}")]
    MalformedBody { reason: String },

    #[error("PDF appears to be empty or contains no extractable text")]
    EmptyText,

    #[error("Extracted text is too short ({length} characters, minimum {minimum})")]
    TextTooShort { length: usize, minimum: usize },

    #[error("{field} is required")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("failed to parse config file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建 PDF 提取错误
    pub fn extraction(reason: impl Into<String>) -> Self {
        AppError::Extraction {
            reason: reason.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(reason: impl Into<String>) -> Self {
        AppError::Internal(reason.into())
    }

    /// 是否属于调用方可修正的错误（4xx）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Input(_)
                | AppError::Extraction { .. }
                | AppError::InsufficientContent { .. }
                | AppError::NotFound(_)
                | AppError::PayloadTooLarge { .. }
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Input(InputError::MalformedParams {
            reason: err.to_string(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
