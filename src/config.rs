use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::{AppResult, ConfigError};

/// 配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "NOTES_CONFIG";
/// 默认配置文件
pub const DEFAULT_CONFIG_FILE: &str = "notes.toml";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（可选）→ 环境变量
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 服务端 ---
    /// 监听地址
    pub server_addr: String,
    /// 网页摘录的最大字符数
    pub max_page_chars: usize,
    /// 抓取网页时使用的 User-Agent
    pub user_agent: String,
    // --- 客户端 ---
    /// 后端服务地址
    pub backend_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemma-3n-e2b-it".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 4096,
            server_addr: "0.0.0.0:5000".to_string(),
            max_page_chars: 30_000,
            user_agent: "Mozilla/5.0".to_string(),
            backend_url: "http://127.0.0.1:5000".to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    llm_temperature: Option<f32>,
    llm_max_tokens: Option<u32>,
    server_addr: Option<String>,
    max_page_chars: Option<usize>,
    user_agent: Option<String>,
    backend_url: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 完整加载流程
    ///
    /// `NOTES_CONFIG` 指定的文件必须存在；未指定时 `notes.toml` 存在才读取。
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => config.merge_toml_file(Path::new(&path))?,
            Err(_) => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config.merge_toml_file(path)?;
                }
            }
        }

        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 仅使用默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();
        config.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// 从 TOML 文件合并配置
    pub fn merge_toml_file(&mut self, path: &Path) -> AppResult<()> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml_str(&content, &path.display().to_string())
    }

    /// 从 TOML 文本合并配置
    pub fn merge_toml_str(&mut self, content: &str, origin: &str) -> AppResult<()> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|source| ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            })?;

        if let Some(v) = file.llm_api_key {
            self.llm_api_key = v;
        }
        if let Some(v) = file.llm_api_base_url {
            self.llm_api_base_url = v;
        }
        if let Some(v) = file.llm_model_name {
            self.llm_model_name = v;
        }
        if let Some(v) = file.llm_temperature {
            self.llm_temperature = v;
        }
        if let Some(v) = file.llm_max_tokens {
            self.llm_max_tokens = v;
        }
        if let Some(v) = file.server_addr {
            self.server_addr = v;
        }
        if let Some(v) = file.max_page_chars {
            self.max_page_chars = v;
        }
        if let Some(v) = file.user_agent {
            self.user_agent = v;
        }
        if let Some(v) = file.backend_url {
            self.backend_url = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 便于测试时替换真实环境。
    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LLM_API_KEY") {
            self.llm_api_key = v;
        }
        if let Some(v) = lookup("LLM_API_BASE_URL") {
            self.llm_api_base_url = v;
        }
        if let Some(v) = lookup("LLM_MODEL_NAME") {
            self.llm_model_name = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_TEMPERATURE", "f32")? {
            self.llm_temperature = v;
        }
        if let Some(v) = parse_var(&lookup, "LLM_MAX_TOKENS", "u32")? {
            self.llm_max_tokens = v;
        }
        if let Some(v) = lookup("SERVER_ADDR") {
            self.server_addr = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_PAGE_CHARS", "usize")? {
            self.max_page_chars = v;
        }
        if let Some(v) = lookup("SCRAPE_USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = parse_var(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 是否配置了 API 密钥
    pub fn has_api_key(&self) -> bool {
        !self.llm_api_key.trim().is_empty()
    }
}

fn parse_var<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_page_chars, 30_000);
        assert_eq!(config.user_agent, "Mozilla/5.0");
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("LLM_API_KEY", "secret"),
            ("MAX_PAGE_CHARS", "100"),
            ("VERBOSE_LOGGING", "true"),
        ]);
        let mut config = Config::default();
        config
            .apply_env_with(|name| vars.get(name).cloned())
            .unwrap();

        assert!(config.has_api_key());
        assert_eq!(config.max_page_chars, 100);
        assert!(config.verbose_logging);
        assert_eq!(config.llm_model_name, "gemma-3n-e2b-it");
    }

    #[test]
    fn test_env_parse_failure() {
        let vars = env(&[("MAX_PAGE_CHARS", "lots")]);
        let mut config = Config::default();
        let err = config
            .apply_env_with(|name| vars.get(name).cloned())
            .unwrap_err();
        assert!(err.to_string().contains("MAX_PAGE_CHARS"));
    }

    #[test]
    fn test_toml_then_env() {
        let mut config = Config::default();
        config
            .merge_toml_str(
                r#"
llm_model_name = "gemini-1.5-pro"
server_addr = "127.0.0.1:8080"
"#,
                "inline",
            )
            .unwrap();
        assert_eq!(config.llm_model_name, "gemini-1.5-pro");
        assert_eq!(config.server_addr, "127.0.0.1:8080");

        let vars = env(&[("SERVER_ADDR", "127.0.0.1:9000")]);
        config
            .apply_env_with(|name| vars.get(name).cloned())
            .unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:9000");
        assert_eq!(config.llm_model_name, "gemini-1.5-pro");
    }

    #[test]
    fn test_bad_toml() {
        let mut config = Config::default();
        let err = config.merge_toml_str("max_page_chars = \"x\"", "inline").unwrap_err();
        assert_eq!(err.kind(), "ConfigError");
    }
}
