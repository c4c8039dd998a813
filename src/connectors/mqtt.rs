// @file: twin_distributor/src/connectors/mqtt.rs
// @description: MQTT feed from the collector app, queued to a dispatch worker per message.
// @author: LAS.

use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use crate::connectors::route_message;
use crate::core::dispatcher::Dispatcher;
use crate::core::error::{DistributorError, Result};
use crate::utils::config::AppConfig;


// Publishes waiting for the dispatch worker. Beyond this the poll loop drops them.
const DISPATCH_QUEUE_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: String,
}


//
// FACTORY FUNCTION
//

/// Starts the dispatch worker and the broker session. The session task owns the
/// queue sender, so the worker exits once the session ends.
pub fn spawn_mqtt_connector(dispatcher: Dispatcher, config: AppConfig) -> JoinHandle<()> {
    let (queue_tx, queue_rx) = mpsc::channel::<InboundMessage>(DISPATCH_QUEUE_DEPTH);

    tokio::spawn(async move {
        run_dispatch_worker(dispatcher, queue_rx).await;
    });

    tokio::spawn(async move {
        connect_mqtt(queue_tx, config).await;
    })
}


//
// CONNECTION LOGIC
//

pub async fn connect_mqtt(queue: mpsc::Sender<InboundMessage>, config: AppConfig) {
    let mut backoff_seconds: u64 = 1;

    loop {
        info!(
            "Connecting to MQTT broker {}:{} (topic {})",
            config.mqtt_broker_host, config.mqtt_broker_port, config.mqtt_topic
        );

        match run_session(&queue, &config, &mut backoff_seconds).await {
            Ok(()) => {
                info!("MQTT session closed");
                return;
            }
            Err(e) => {
                error!("MQTT session failed: {}. Retrying in {}s", e, backoff_seconds);
                sleep(Duration::from_secs(backoff_seconds)).await;
            }
        }

        backoff_seconds = std::cmp::min(backoff_seconds * 2, config.mqtt_reconnect_delay.max(1));
    }
}

async fn run_session(queue: &mpsc::Sender<InboundMessage>, config: &AppConfig, backoff_seconds: &mut u64) -> Result<()> {
    let mut options = MqttOptions::new(&config.mqtt_client_id, &config.mqtt_broker_host, config.mqtt_broker_port);
    options.set_keep_alive(Duration::from_secs(config.mqtt_keep_alive_secs));
    options.set_clean_session(true);

    let (client, mut eventloop) = AsyncClient::new(options, 100);
    client
        .subscribe(&config.mqtt_topic, QoS::AtMostOnce)
        .await
        .map_err(|e| DistributorError::Mqtt(e.to_string()))?;

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if !forward_publish(queue, &publish.topic, &publish.payload) {
                    warn!("Dispatch worker stopped, closing MQTT session");
                    return Ok(());
                }
            }
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                *backoff_seconds = 1;
                info!("Connected to MQTT broker");
            }
            Ok(Event::Incoming(Packet::Disconnect)) => return Ok(()),
            Ok(_) => {}
            Err(e) => return Err(DistributorError::Mqtt(e.to_string())),
        }
    }
}


//
// DISPATCH QUEUE
//

/// Hands a publish to the dispatch worker without waiting for it, so slow twin
/// updates never stall the poll loop. A full queue drops the message (QoS 0).
/// Returns false once the worker is gone.
pub fn forward_publish(queue: &mpsc::Sender<InboundMessage>, topic: &str, payload: &[u8]) -> bool {
    let message = InboundMessage {
        topic: topic.to_string(),
        payload: String::from_utf8_lossy(payload).into_owned(),
    };

    match queue.try_send(message) {
        Ok(()) => true,
        Err(TrySendError::Full(dropped)) => {
            warn!("Dispatch queue full, dropping message on {}", dropped.topic);
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Drains the queue in arrival order until every sender is dropped.
pub async fn run_dispatch_worker(dispatcher: Dispatcher, mut queue: mpsc::Receiver<InboundMessage>) {
    while let Some(message) = queue.recv().await {
        handle_message(&dispatcher, &message.topic, &message.payload).await;
    }
    debug!("MQTT dispatch worker stopped");
}


//
// MESSAGE HANDLER
//

pub async fn handle_message(dispatcher: &Dispatcher, topic: &str, payload: &str) {
    let Some(sensor_type) = route_message(topic, payload) else {
        warn!("Dropping unclassified message on {} ({} bytes)", topic, payload.len());
        return;
    };

    debug!("Routing {} message from {}", sensor_type, topic);
    if let Err(e) = dispatcher.dispatch(sensor_type, payload).await {
        error!("Failed to process {} message from {}: {}", sensor_type, topic, e);
    }
}
