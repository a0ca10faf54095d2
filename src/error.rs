//! 错误类型
//!
//! 五类业务错误（抓取 / 输入 / 模型 / 解析 / 序列化）+ 启动配置错误。
//! HTTP 边界只区分"输入错误"和"其他"，见 `api::handlers`。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum NotesError {
    /// 网页抓取失败（网络错误或非 2xx 状态码）
    #[error("抓取错误: {0}")]
    Fetch(#[from] FetchError),
    /// 缺少必填字段或字段取值非法
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
    /// 上游模型调用失败或返回为空
    #[error("模型错误: {0}")]
    Model(#[from] ModelError),
    /// 上游模型返回内容不符合预期结构
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 文档构建失败
    #[error("文档序列化错误: {0}")]
    Serialization(#[from] SerializationError),
    /// 配置错误（仅在启动阶段出现）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 网页抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败
    #[error("请求 {url} 失败: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务端返回非成功状态码
    #[error("请求 {url} 返回状态码 {status}")]
    BadStatus { url: String, status: u16 },
    /// 读取响应体失败
    #[error("读取 {url} 响应内容失败: {source}")]
    BodyReadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// 输入校验错误
#[derive(Debug, Error)]
pub enum InputError {
    /// 必填字段为空
    #[error("{field} is required")]
    MissingField { field: &'static str },
    /// 多个必填字段为空
    #[error("{} are required", .fields.join(" and "))]
    MissingFields { fields: Vec<&'static str> },
    /// 字段取值非法
    #[error("{field} 取值非法: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    /// 请求体无法解析
    #[error("请求体无法解析: {reason}")]
    MalformedBody { reason: String },
}

/// 上游模型错误
#[derive(Debug, Error)]
pub enum ModelError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求构建失败
    #[error("LLM 请求构建失败 (模型: {model}): {source}")]
    RequestBuildFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("Empty response from model {model}")]
    EmptyResponse { model: String },
}

/// 模型输出解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    /// 不是合法 JSON，或结构不匹配
    #[error("{source}")]
    InvalidJson {
        /// 原始回复（截断后，仅用于日志）
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    /// 回复中找不到 `[...]`
    #[error("No JSON array found in model output")]
    NoArrayFound { raw: String },
    /// 记录条数与问题数量不一致
    #[error("模型返回 {actual} 条记录，但提交了 {expected} 个问题")]
    RecordCountMismatch { expected: usize, actual: usize },
}

/// 文档序列化错误
#[derive(Debug, Error)]
pub enum SerializationError {
    /// docx 打包失败
    #[error("docx 打包失败: {source}")]
    PackFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 客户端调用后端时的错误
#[derive(Debug, Error)]
pub enum BackendError {
    /// 请求没有送达或没有收到响应
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    /// 后端返回了错误响应
    #[error("Error: {message}{}", .details.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Rejected {
        status: u16,
        message: String,
        details: Option<String>,
    },
    /// 响应无法解析
    #[error("响应无法解析: {reason}")]
    Decode { reason: String },
}

// ========== 便捷构造函数 ==========

impl NotesError {
    /// 创建缺失字段错误
    pub fn missing_field(field: &'static str) -> Self {
        NotesError::Input(InputError::MissingField { field })
    }

    /// 创建字段取值非法错误
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        NotesError::Input(InputError::InvalidValue {
            field,
            reason: reason.into(),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        NotesError::Model(ModelError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建模型空响应错误
    pub fn empty_response(model: impl Into<String>) -> Self {
        NotesError::Model(ModelError::EmptyResponse {
            model: model.into(),
        })
    }

    /// 是否为输入错误（HTTP 边界据此返回 400）
    pub fn is_input(&self) -> bool {
        matches!(self, NotesError::Input(_))
    }

    /// 不带类别前缀的错误信息，作为 HTTP 响应体中的 `error`
    pub fn message(&self) -> String {
        match self {
            NotesError::Fetch(e) => e.to_string(),
            NotesError::Input(e) => e.to_string(),
            NotesError::Model(e) => e.to_string(),
            NotesError::Parse(e) => e.to_string(),
            NotesError::Serialization(e) => e.to_string(),
            NotesError::Config(e) => e.to_string(),
        }
    }

    /// 错误类别名称，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            NotesError::Fetch(_) => "FetchError",
            NotesError::Input(_) => "InputError",
            NotesError::Model(_) => "ModelError",
            NotesError::Parse(_) => "ParseError",
            NotesError::Serialization(_) => "SerializationError",
            NotesError::Config(_) => "ConfigError",
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, NotesError>;
