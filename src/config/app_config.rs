use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub upstream: UpstreamConfig,
    pub client: ClientConfig,
    pub store: StoreSettings,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed browser origins; empty allows any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Question-answering service the proxy forwards to
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Also settable through `API_BASE_URL`
    pub base_url: String,
    pub ask_path: String,
    pub timeout_secs: u64,
}

/// Where the chat client sends questions
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub route: String,
    pub timeout_secs: u64,
}

/// Key/value store backing the answer cache and usage counter
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// `file` or `memory`
    pub kind: String,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub usage_limit: u32,
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            ask_path: "/ask".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            route: "/chat".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: "file".to_string(),
            path: ".folio/chat_store.json".to_string(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            usage_limit: 10,
            cache_capacity: 50,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("upstream.base_url", std::env::var("API_BASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}
