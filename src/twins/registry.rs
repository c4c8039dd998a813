// @file: twin_distributor/src/twins/registry.rs
// @description: In-memory twin store keyed by twin id, with upsert-merge semantics.
// @author: LAS.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use crate::core::error::Result;
use crate::core::interfaces::TwinUpdater;
use crate::core::models::UpdateRequest;
use crate::twins::{key_value, twin_document, twin_id};


//
// TYPE DEFINITIONS
//

pub type TwinMap = Arc<RwLock<HashMap<String, Map<String, Value>>>>;

#[derive(Clone, Default)]
pub struct TwinRegistry {
    twins: TwinMap,
}

impl TwinRegistry {
    pub fn new() -> Self {
        TwinRegistry::default()
    }


    //
    // DATA ACCESSORS
    //

    pub async fn get(&self, id: &str) -> Option<Map<String, Value>> {
        self.twins.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.twins.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.twins.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> HashMap<String, Map<String, Value>> {
        self.twins.read().await.clone()
    }


    //
    // INTERNAL HELPER
    //

    async fn upsert(&self, id: String, document: Map<String, Value>) {
        let mut twins = self.twins.write().await;
        let twin = twins.entry(id).or_default();
        for (field, value) in document {
            twin.insert(field, value);
        }
    }
}

#[async_trait]
impl TwinUpdater for TwinRegistry {
    async fn update_twin_instances(&self, request: UpdateRequest) -> Result<()> {
        let Some(key_field) = request.key_field else {
            warn!("Twin update without key field, {} instance(s) not stored", request.record.instances().len());
            return Ok(());
        };

        // #1. Resolve every id first so a bad instance leaves the registry untouched
        let mut resolved: Vec<(String, Map<String, Value>)> = Vec::new();
        for instance in request.record.instances() {
            let key: String = key_value(instance, key_field)?;
            resolved.push((twin_id(request.type_tag, &key), twin_document(instance, request.schema_id)));
        }

        // #2. Upsert
        for (id, document) in resolved {
            debug!("Upserting twin {}", id);
            self.upsert(id, document).await;
        }
        Ok(())
    }
}
