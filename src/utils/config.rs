// @file: twin_distributor/src/utils/config.rs
// @description: Layered configuration (defaults, optional config file, APP_ environment).
// @author: LAS.

use serde::Deserialize;
use config::{Config, ConfigError, File, Environment};

//
// TYPE DEFINITIONS
//

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TwinBackend {
    Memory,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,

    // Ingest Server
    pub server_bind_address: String,

    // Twin Service
    pub twin_backend: TwinBackend,
    pub twin_api_url: String,
    pub twin_api_version: String,
    pub twin_api_token: Option<String>,
    pub twin_request_timeout_secs: u64,

    // MQTT Feed
    pub mqtt_enabled: bool,
    pub mqtt_broker_host: String,
    pub mqtt_broker_port: u16,
    pub mqtt_client_id: String,
    pub mqtt_topic: String,
    pub mqtt_keep_alive_secs: u64,
    pub mqtt_reconnect_delay: u64,
}

impl AppConfig {
    //
    // PUBLIC INTERFACE
    //

    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Defaults only, no file or environment overrides.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("log_level", "info")?

            // Ingest Server
            .set_default("server_bind_address", "127.0.0.1:8080")?

            // Twin Service
            .set_default("twin_backend", "memory")?
            .set_default("twin_api_url", "https://localhost:8443")?
            .set_default("twin_api_version", "2023-10-31")?
            .set_default("twin_request_timeout_secs", 10)?

            // MQTT Feed (collector publishes on dt/message)
            .set_default("mqtt_enabled", false)?
            .set_default("mqtt_broker_host", "broker.hivemq.com")?
            .set_default("mqtt_broker_port", 1883)?
            .set_default("mqtt_client_id", "twin-distributor")?
            .set_default("mqtt_topic", "dt/#")?
            .set_default("mqtt_keep_alive_secs", 30)?
            .set_default("mqtt_reconnect_delay", 60)
    }
}
