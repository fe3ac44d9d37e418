//! Remote design store
//!
//! [`RestStore`] speaks the PostgREST-style API of the persistence
//! service: inserts return the stored representation, reads are shaped by
//! query parameters. Every call runs under the configured deadline.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use decora_core::{AppConfig, DesignRecord};

use crate::error::{Error, Result};
use crate::DESIGNS_TABLE;

/// Boundary interface to the durable design store.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Insert a design snapshot; returns the stored row with the
    /// service-assigned `created_at`. Single attempt, no idempotency key:
    /// repeated saves create duplicate rows.
    async fn save_design(&self, record: &DesignRecord) -> Result<DesignRecord>;

    /// Fetch the most recent design, or `None` when nothing is stored.
    /// An empty table is a valid result, not an error.
    async fn load_latest(&self) -> Result<Option<DesignRecord>>;
}

/// PostgREST-style client for the persistence service.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl RestStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.persistence_url.trim_end_matches('/').to_string(),
            api_key: config.persistence_key.clone(),
            timeout: config.request_timeout(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, DESIGNS_TABLE)
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Unconfigured("persistence_url"));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for RestStore {
    #[instrument(skip(self, record))]
    async fn save_design(&self, record: &DesignRecord) -> Result<DesignRecord> {
        self.ensure_configured()?;

        let request = self
            .client
            .post(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&[record]);

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let response = check_status(response).await?;

        let mut rows: Vec<DesignRecord> = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        debug!(rows = rows.len(), "design insert acknowledged");
        rows.pop().ok_or(Error::EmptyResponse)
    }

    #[instrument(skip(self))]
    async fn load_latest(&self) -> Result<Option<DesignRecord>> {
        self.ensure_configured()?;

        let request = self
            .client
            .get(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "*"),
                ("order", "created_at.desc"),
                ("limit", "1"),
            ]);

        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        let response = check_status(response).await?;

        let mut rows: Vec<DesignRecord> = tokio::time::timeout(self.timeout, response.json())
            .await
            .map_err(|_| Error::Timeout(self.timeout))??;
        debug!(rows = rows.len(), "latest design fetched");
        Ok(rows.pop())
    }
}

/// Map a non-2xx response to [`Error::Status`], carrying the body text.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(Error::Status {
        code: status.as_u16(),
        message,
    })
}
