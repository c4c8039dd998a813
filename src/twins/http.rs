// @file: twin_distributor/src/twins/http.rs
// @description: HTTP client pushing twin instances to a Digital Twins style REST API.
// @author: LAS.

use std::time::Duration;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::{Map, Value};
use url::Url;
use crate::core::error::{DistributorError, Result};
use crate::core::interfaces::TwinUpdater;
use crate::core::models::UpdateRequest;
use crate::twins::{key_value, twin_document, twin_id};
use crate::utils::config::AppConfig;


pub struct HttpTwinClient {
    client: Client,
    base_url: Url,
    api_version: String,
    token: Option<String>,
}

impl HttpTwinClient {
    //
    // PUBLIC INTERFACE
    //

    pub fn new(base_url: &str, api_version: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client: Client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTwinClient {
            client,
            base_url: Url::parse(base_url)?,
            api_version: api_version.to_string(),
            token,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        HttpTwinClient::new(
            &config.twin_api_url,
            &config.twin_api_version,
            config.twin_api_token.clone(),
            Duration::from_secs(config.twin_request_timeout_secs),
        )
    }

    /// `{base}/digitaltwins/{id}?api-version={v}`, with the id percent-encoded as a path segment.
    pub fn twin_url(&self, id: &str) -> Result<Url> {
        let mut url: Url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DistributorError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("digitaltwins")
            .push(id);
        url.query_pairs_mut().append_pair("api-version", &self.api_version);
        Ok(url)
    }


    //
    // INTERNAL HELPER
    //

    async fn put_twin(&self, id: &str, document: &Map<String, Value>) -> Result<()> {
        // #1. Build request
        let url: Url = self.twin_url(id)?;
        let mut request = self.client.put(url).json(document);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        // #2. Execute
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(DistributorError::TwinApi { status: status.as_u16(), body });
        }

        debug!("Twin {} updated ({})", id, status);
        Ok(())
    }
}

#[async_trait]
impl TwinUpdater for HttpTwinClient {
    async fn update_twin_instances(&self, request: UpdateRequest) -> Result<()> {
        let Some(key_field) = request.key_field else {
            warn!("Twin update without key field, {} instance(s) not sent", request.record.instances().len());
            return Ok(());
        };

        for instance in request.record.instances() {
            let key: String = key_value(instance, key_field)?;
            let id: String = twin_id(request.type_tag, &key);
            self.put_twin(&id, &twin_document(instance, request.schema_id)).await?;
        }
        Ok(())
    }
}
