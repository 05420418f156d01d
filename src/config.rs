//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `RAPID_AID__*` 覆盖（双下划线表示嵌套，如 `RAPID_AID__LLM__PROVIDER=gemini`）。
//! API Key 不写入配置文件，由 GEMINI_API_KEY / OPENAI_API_KEY / DEEPSEEK_API_KEY 提供。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub server: ServerSection,
    pub llm: LlmSection,
}

/// [app] 段：应用名、匿名请求者占位名
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    /// 未填写姓名时使用的占位名
    #[serde(default = "default_anonymous_name")]
    pub anonymous_name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            anonymous_name: default_anonymous_name(),
        }
    }
}

fn default_anonymous_name() -> String {
    "Anonymous".to_string()
}

/// [server] 段：监听地址与 CORS
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 开发期允许任意来源（前端独立部署时使用）
    #[serde(default = "default_cors_allow_any_origin")]
    pub cors_allow_any_origin: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_allow_any_origin: default_cors_allow_any_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_allow_any_origin() -> bool {
    true
}

/// [llm] 段：后端选择、超时与重试
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：gemini / openai / deepseek / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    /// 未设置时使用各后端的默认模型
    pub model: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
    #[serde(default)]
    pub retry: LlmRetrySection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
            retry: LlmRetrySection::default(),
        }
    }
}

fn default_provider() -> String {
    "gemini".to_string()
}

impl LlmSection {
    /// 配置的模型名，未设置（或为空白）时返回 fallback
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次分类请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    30
}

/// [llm.retry] 段：默认 0 次重试，即单次调用失败立即走兜底
#[derive(Debug, Clone, Deserialize)]
pub struct LlmRetrySection {
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
}

impl Default for LlmRetrySection {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
        }
    }
}

fn default_initial_backoff_ms() -> u64 {
    200
}

/// 从 config 目录加载配置，环境变量 RAPID_AID__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 RAPID_AID__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("RAPID_AID")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
