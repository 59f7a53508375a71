use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    /// Overrides the bundled category tables when set.
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Where each predictor artifact lives: a local path or an http(s) URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default, rename = "yield")]
    pub yield_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            model: default_model(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            prompt_template: default_prompt_template(),
            fallback_message: default_fallback_message(),
            max_query_chars: default_max_query_chars(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5500".to_string(),
        "http://127.0.0.1:5500".to_string(),
        "https://agrosarthi-frontend.web.app".to_string(),
    ]
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_prompt_template() -> String {
    "Provide short, concise, and straightforward answers related to agriculture in bullet points. Answer the query: {query}".to_string()
}

fn default_fallback_message() -> String {
    "Sorry, I could not find an answer.".to_string()
}

fn default_max_query_chars() -> usize {
    2000
}
