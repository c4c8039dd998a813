// @file: twin_distributor/src/core/mod.rs
// @description: Exports dispatch logic, collaborator traits and data structures.
// @author: LAS.

pub mod dispatcher;
pub mod error;
pub mod interfaces;
pub mod models;
