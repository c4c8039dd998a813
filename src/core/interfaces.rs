// @file: twin_distributor/src/core/interfaces.rs
// @description: Collaborator traits consumed by the dispatcher.
// @author: LAS.

use crate::core::error::Result;
use crate::core::models::{CleanedRecord, UpdateRequest};
use async_trait::async_trait;

//
// TRAIT DEFINITIONS
//

pub trait Cleaner: Send + Sync {
    // #1. Normalize one raw payload into a record the twin updater understands
    fn clean(&self, raw: &str) -> Result<CleanedRecord>;
}

#[async_trait]
pub trait TwinUpdater: Send + Sync {
    async fn update_twin_instances(&self, request: UpdateRequest) -> Result<()>;
}
