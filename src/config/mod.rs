//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ChatConfig, ClientConfig, LogFormat, LoggingConfig, ServerConfig, StoreSettings,
    UpstreamConfig,
};
