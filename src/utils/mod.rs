// @file: twin_distributor/src/utils/mod.rs
// @description: Configuration loading.
// @author: LAS.

pub mod config;
