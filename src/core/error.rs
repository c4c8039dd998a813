// @file: twin_distributor/src/core/error.rs
// @description: Crate-wide error type shared by cleaners, twin updaters and transports.
// @author: LAS.

use thiserror::Error;
use crate::core::models::SensorType;


#[derive(Debug, Error)]
pub enum DistributorError {
    #[error("malformed {sensor} payload: {reason}")]
    MalformedPayload { sensor: SensorType, reason: String },

    #[error("twin instance is missing key field '{field}'")]
    MissingKeyField { field: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("twin api returned {status}: {body}")]
    TwinApi { status: u16, body: String },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("mqtt error: {0}")]
    Mqtt(String),
}

impl DistributorError {
    pub fn malformed(sensor: SensorType, reason: impl Into<String>) -> Self {
        DistributorError::MalformedPayload { sensor, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, DistributorError>;
