// @file: twin_distributor/src/tests/mod.rs
// @description: Test suites and the recording collaborators they share.
// @author: LAS.

mod routing_tests;

use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::{Cleaner, TwinUpdater};
use crate::core::models::{CleanedRecord, SensorType, UpdateRequest};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};


//
// RECORDING DOUBLES
//

pub struct RecordingCleaner {
    pub sensor: SensorType,
    pub output: Value,
    pub fail: bool,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingCleaner {
    pub fn returning(sensor: SensorType, output: Value) -> Self {
        RecordingCleaner { sensor, output, fail: false, calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn failing(sensor: SensorType) -> Self {
        RecordingCleaner { sensor, output: Value::Null, fail: true, calls: Arc::new(Mutex::new(Vec::new())) }
    }
}

impl Cleaner for RecordingCleaner {
    fn clean(&self, raw: &str) -> Result<CleanedRecord> {
        self.calls.lock().unwrap().push(raw.to_string());
        if self.fail {
            return Err(DistributorError::malformed(self.sensor, "rejected by test cleaner"));
        }
        Ok(CleanedRecord::new(self.output.clone()))
    }
}

#[derive(Default)]
pub struct RecordingUpdater {
    pub fail: bool,
    pub calls: Arc<Mutex<Vec<UpdateRequest>>>,
}

#[async_trait]
impl TwinUpdater for RecordingUpdater {
    async fn update_twin_instances(&self, request: UpdateRequest) -> Result<()> {
        self.calls.lock().unwrap().push(request);
        if self.fail {
            return Err(DistributorError::TwinApi { status: 503, body: "unavailable".to_string() });
        }
        Ok(())
    }
}
