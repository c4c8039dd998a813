// @file: twin_distributor/src/lib.rs
// @description: Exposes the distributor modules for the binary and for integration use.
// @author: LAS.

pub mod api;
pub mod cleaners;
pub mod connectors;
pub mod core;
pub mod twins;
pub mod utils;

#[cfg(test)]
mod tests;
