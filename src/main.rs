// @file: twin_distributor/src/main.rs
// @description: Wires configuration, logging, the twin backend and the inbound feeds.
// @author: LAS.

use std::sync::Arc;
use log::{error, info};
use twin_distributor::api::ws_server;
use twin_distributor::connectors::mqtt;
use twin_distributor::core::dispatcher::Dispatcher;
use twin_distributor::core::interfaces::TwinUpdater;
use twin_distributor::twins::{HttpTwinClient, TwinRegistry};
use twin_distributor::utils::config::{AppConfig, TwinBackend};

#[tokio::main]
async fn main() {
    // 1. Environment & Config
    dotenv::dotenv().ok();
    let config: AppConfig = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Logger (RUST_LOG still wins over the configured level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    info!(">>> Twin Distributor is Starting... <<<");

    // 3. Twin Backend
    let updater: Arc<dyn TwinUpdater> = match config.twin_backend {
        TwinBackend::Memory => Arc::new(TwinRegistry::new()),
        TwinBackend::Http => match HttpTwinClient::from_config(&config) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("Failed to build twin API client: {}", e);
                std::process::exit(1);
            }
        },
    };
    info!("Twin backend: {:?}", config.twin_backend);

    let dispatcher: Dispatcher = Dispatcher::with_default_cleaners(updater);

    // 4. Feeds
    if config.mqtt_enabled {
        mqtt::spawn_mqtt_connector(dispatcher.clone(), config.clone());
    }

    if let Err(e) = ws_server::start_server(dispatcher, config).await {
        error!("Ingest server stopped: {}", e);
        std::process::exit(1);
    }
}
