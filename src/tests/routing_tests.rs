// @file: twin_distributor/src/tests/routing_tests.rs
// @description: Payload sniffing, topic routing, the MQTT dispatch queue and WebSocket frame handling.
// @author: LAS.

use crate::api::ws_server::process_frame;
use crate::connectors::mqtt::{forward_publish, handle_message, run_dispatch_worker, InboundMessage};
use crate::connectors::{classify_payload, route_message};
use crate::core::dispatcher::Dispatcher;
use crate::core::models::{IngestReply, SensorType};
use crate::twins::TwinRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;


//
// CLASSIFICATION
//

#[test]
fn classifies_collector_payloads_by_shape() {
    assert_eq!(classify_payload("{\"action\":\"open\"}"), Some(SensorType::Action));
    assert_eq!(classify_payload("[{\"action\":\"open\"}]"), Some(SensorType::Action));
    assert_eq!(classify_payload("[[SSID: home, BSSID: aa:bb:cc:dd:ee:ff, level: -45]]"), Some(SensorType::Wifi));
    assert_eq!(classify_payload(" \nCellLte(network=null, eci=1)"), Some(SensorType::Cell));
    assert_eq!(
        classify_payload("[[Pixel 7, AA:BB:CC:DD:EE:FF, -60, 524, false]]"),
        Some(SensorType::Bluetooth)
    );
}

#[test]
fn unclassifiable_payloads_are_rejected() {
    assert_eq!(classify_payload(""), None);
    assert_eq!(classify_payload("[]"), None);
    assert_eq!(classify_payload("Cellular"), None);
    assert_eq!(classify_payload("[[a, b, c, d, e]]"), None);
}

#[test]
fn topic_segment_wins_over_sniffing() {
    assert_eq!(route_message("dt/bluetooth", "{\"x\":1}"), Some(SensorType::Bluetooth));
    assert_eq!(route_message("dt/message", "{\"x\":1}"), Some(SensorType::Action));
    assert_eq!(route_message("dt/message", "???"), None);
}


//
// TRANSPORT HANDLERS
//

#[tokio::test]
async fn mqtt_message_reaches_the_registry() {
    let registry = TwinRegistry::new();
    let dispatcher = Dispatcher::with_default_cleaners(Arc::new(registry.clone()));

    handle_message(&dispatcher, "dt/message", "[[Pixel 7, AA:BB:CC:DD:EE:FF, -60, 524, false]]").await;
    handle_message(&dispatcher, "dt/message", "???").await;

    assert_eq!(registry.len().await, 1);
    assert!(registry.get("bluetooth-aa-bb-cc-dd-ee-ff").await.is_some());
}

#[tokio::test]
async fn mqtt_publishes_flow_through_the_dispatch_worker() {
    let registry = TwinRegistry::new();
    let dispatcher = Dispatcher::with_default_cleaners(Arc::new(registry.clone()));
    let (queue_tx, queue_rx) = mpsc::channel::<InboundMessage>(8);
    let worker = tokio::spawn(run_dispatch_worker(dispatcher, queue_rx));

    assert!(forward_publish(&queue_tx, "dt/bluetooth", b"[[Pixel 7, AA:BB:CC:DD:EE:FF, -60, 524, false]]"));
    assert!(forward_publish(&queue_tx, "dt/wifi", b"[[SSID: home, BSSID: 11:22:33:44:55:66, level: -45]]"));
    assert!(forward_publish(&queue_tx, "dt/message", b"???"));

    // Closing the queue lets the worker drain and stop
    drop(queue_tx);
    worker.await.unwrap();

    assert_eq!(registry.len().await, 2);
    assert!(registry.get("bluetooth-aa-bb-cc-dd-ee-ff").await.is_some());
    assert!(registry.get("wifi-11-22-33-44-55-66").await.is_some());
}

#[tokio::test]
async fn mqtt_forwarding_never_waits_on_a_full_queue() {
    let (queue_tx, mut queue_rx) = mpsc::channel::<InboundMessage>(1);

    assert!(forward_publish(&queue_tx, "dt/wifi", b"first"));
    assert!(forward_publish(&queue_tx, "dt/wifi", b"second"));

    let kept = queue_rx.try_recv().unwrap();
    assert_eq!(kept, InboundMessage { topic: "dt/wifi".to_string(), payload: "first".to_string() });
    assert!(queue_rx.try_recv().is_err());

    drop(queue_rx);
    assert!(!forward_publish(&queue_tx, "dt/wifi", b"third"));
}

#[tokio::test]
async fn ws_frames_are_acknowledged_or_rejected() {
    let registry = TwinRegistry::new();
    let dispatcher = Dispatcher::with_default_cleaners(Arc::new(registry.clone()));

    let ok = process_frame(&dispatcher, r#"{"type":"wifi","data":"[[SSID: home, BSSID: aa:bb:cc:dd:ee:ff, level: -45]]"}"#).await;
    assert_eq!(ok, IngestReply::Ok { sensor_type: SensorType::Wifi });
    assert!(registry.get("wifi-aa-bb-cc-dd-ee-ff").await.is_some());

    let bad_type = process_frame(&dispatcher, r#"{"type":"radar","data":""}"#).await;
    assert!(matches!(bad_type, IngestReply::Error { .. }));

    let bad_payload = process_frame(&dispatcher, r#"{"type":"cell","data":"garbage"}"#).await;
    match bad_payload {
        IngestReply::Error { message } => assert!(message.starts_with("malformed cell payload")),
        other => panic!("unexpected reply: {:?}", other),
    }
}

#[test]
fn replies_serialize_with_status_tag() {
    let ok = serde_json::to_value(IngestReply::Ok { sensor_type: SensorType::Cell }).unwrap();
    assert_eq!(ok, serde_json::json!({ "status": "ok", "type": "cell" }));

    let err = serde_json::to_value(IngestReply::Error { message: "boom".to_string() }).unwrap();
    assert_eq!(err, serde_json::json!({ "status": "error", "message": "boom" }));
}
