// @file: twin_distributor/src/core/dispatcher.rs
// @description: Routes raw sensor payloads through their cleaner into the twin updater.
// @author: LAS.

use std::sync::Arc;
use log::{debug, warn};
use crate::core::error::Result;
use crate::core::interfaces::{Cleaner, TwinUpdater};
use crate::core::models::{SensorType, UpdateRequest};
use crate::cleaners::{ActionCleaner, BluetoothCleaner, CellCleaner, WifiCleaner};


//
// COLLABORATOR SET
//

#[derive(Clone)]
pub struct CleanerSet {
    pub wifi: Arc<dyn Cleaner>,
    pub cell: Arc<dyn Cleaner>,
    pub action: Arc<dyn Cleaner>,
    pub bluetooth: Arc<dyn Cleaner>,
}

impl CleanerSet {
    fn for_type(&self, sensor_type: SensorType) -> &Arc<dyn Cleaner> {
        match sensor_type {
            SensorType::Wifi => &self.wifi,
            SensorType::Cell => &self.cell,
            SensorType::Action => &self.action,
            SensorType::Bluetooth => &self.bluetooth,
        }
    }
}

impl Default for CleanerSet {
    fn default() -> Self {
        CleanerSet {
            wifi: Arc::new(WifiCleaner),
            cell: Arc::new(CellCleaner),
            action: Arc::new(ActionCleaner),
            bluetooth: Arc::new(BluetoothCleaner),
        }
    }
}


//
// DISPATCHER
//

#[derive(Clone)]
pub struct Dispatcher {
    cleaners: CleanerSet,
    updater: Arc<dyn TwinUpdater>,
}

impl Dispatcher {
    pub fn new(cleaners: CleanerSet, updater: Arc<dyn TwinUpdater>) -> Self {
        Dispatcher { cleaners, updater }
    }

    pub fn with_default_cleaners(updater: Arc<dyn TwinUpdater>) -> Self {
        Dispatcher::new(CleanerSet::default(), updater)
    }

    pub async fn handle_wifi(&self, raw: &str) -> Result<()> {
        self.route(SensorType::Wifi, raw).await
    }

    pub async fn handle_cell(&self, raw: &str) -> Result<()> {
        self.route(SensorType::Cell, raw).await
    }

    pub async fn handle_action(&self, raw: &str) -> Result<()> {
        self.route(SensorType::Action, raw).await?;
        // TODO: confirm with the collector owners whether action updates need a descriptor;
        // the notice text stays as-is until then.
        warn!("Aboreted");
        Ok(())
    }

    pub async fn handle_bluetooth(&self, raw: &str) -> Result<()> {
        self.route(SensorType::Bluetooth, raw).await
    }

    pub async fn dispatch(&self, sensor_type: SensorType, raw: &str) -> Result<()> {
        match sensor_type {
            SensorType::Wifi => self.handle_wifi(raw).await,
            SensorType::Cell => self.handle_cell(raw).await,
            SensorType::Action => self.handle_action(raw).await,
            SensorType::Bluetooth => self.handle_bluetooth(raw).await,
        }
    }


    //
    // INTERNAL HELPER
    //

    async fn route(&self, sensor_type: SensorType, raw: &str) -> Result<()> {
        // #1. Clean (errors leave before the updater is touched)
        let cleaned = self.cleaners.for_type(sensor_type).clean(raw)?;

        // #2. Forward with the per-type descriptor
        let request = UpdateRequest::new(cleaned, sensor_type.descriptor());
        debug!("Dispatching {} update (key={:?})", sensor_type, request.key_field);
        self.updater.update_twin_instances(request).await
    }
}
