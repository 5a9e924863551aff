//! TrueNAS REST API Client
//!
//! This module provides a client for the TrueNAS `/api/v2.0` REST interface.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS via `reqwest`; certificate and hostname checks are disabled
//!   because appliances usually serve a self-signed certificate on a private network
//! - **Authentication**: API key sent as a bearer token on every request
//! - **Errors**: non-2xx responses become [`ManageError::Api`] with the status and the
//!   raw response body; nothing is retried
//!
//! # Example
//!
//! ```no_run
//! use tnmanage::truenas::TrueNasClient;
//!
//! # async fn example() -> tnmanage::error::Result<()> {
//! let client = TrueNasClient::with_params("https://truenas.local", "1-abcdef")?;
//! let id = client.create_dataset("tank", "media", 100).await?;
//! println!("created {}", id);
//! # Ok(())
//! # }
//! ```

use crate::config::TrueNasConfig;
use crate::error::{ClearStep, ManageError, Result};
use crate::truenas::types::*;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

/// Path prefix of the versioned REST API
pub const API_PREFIX: &str = "/api/v2.0";

/// Applied to every request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const GIB: u64 = 1024 * 1024 * 1024;

/// Client for the TrueNAS REST API
///
/// Each method issues one request (three for [`TrueNasClient::clear_dataset`]) and
/// waits for it to finish before returning.
pub struct TrueNasClient {
    base_url: String,
    api_key: SecretString,
    http: reqwest::Client,
}

impl TrueNasClient {
    pub fn new(config: TrueNasConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ManageError::Config("server URL is required".to_string()));
        }
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(ManageError::Config("API token is required".to_string()));
        }

        // Accept self-signed certs
        let tls = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .map_err(|e| ManageError::Config(format!("TLS setup failed: {}", e)))?;

        let http = reqwest::Client::builder()
            .use_preconfigured_tls(tls)
            .no_proxy()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            http,
        })
    }

    /// Connect with an explicit server URL and API token
    pub fn with_params(server: &str, token: &str) -> Result<Self> {
        Self::new(TrueNasConfig::new(server, token)?)
    }

    /// Connect using `TRUENAS_URL` and `TRUENAS_API_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(TrueNasConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the raw response body
    ///
    /// Any status outside 200..300 is an error carrying the status code and body text.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, endpoint);
        debug!("{} {}", method, endpoint);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(self.api_key.expose_secret())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            debug!("{} {} returned {}", method, endpoint, status);
            return Err(ManageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }

    /// Send one request and deserialize the JSON response
    async fn execute<T>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let bytes = self.request(method, endpoint, body).await?;
        serde_json::from_slice(&bytes).map_err(ManageError::Decode)
    }

    /// Create `pool/name` as a filesystem, optionally capped at `quota_gb` GiB
    ///
    /// A quota of zero or less creates the dataset without `refquota`.
    /// Returns the dataset ID assigned by the server.
    pub async fn create_dataset(&self, pool: &str, name: &str, quota_gb: i64) -> Result<String> {
        let request = CreateDatasetRequest {
            name: format!("{}/{}", pool, name),
            kind: FILESYSTEM.to_string(),
            refquota: quota_bytes(quota_gb)?,
        };

        let created: Dataset = self
            .execute(
                Method::POST,
                "/pool/dataset",
                Some(encode_body(&request)?),
            )
            .await?;
        info!("Created dataset {}", created.id);
        Ok(created.id)
    }

    /// All datasets, unfiltered, in server order
    pub async fn query_datasets(&self) -> Result<Vec<Dataset>> {
        self.execute(Method::GET, "/pool/dataset", None).await
    }

    /// Datasets in `pool`, including the pool's root dataset and nested children
    pub async fn list_datasets(&self, pool: &str) -> Result<Vec<Dataset>> {
        let datasets = self.query_datasets().await?;
        Ok(filter_pool(datasets, pool))
    }

    pub async fn get_dataset(&self, id: &str) -> Result<Dataset> {
        self.execute(Method::GET, &dataset_endpoint(id), None).await
    }

    pub async fn delete_dataset(&self, id: &str) -> Result<()> {
        self.request(Method::DELETE, &dataset_endpoint(id), None)
            .await?;
        info!("Deleted dataset {}", id);
        Ok(())
    }

    /// Wipe a dataset by deleting it and creating it again
    ///
    /// Only the name and type survive; quota, compression and every other
    /// property fall back to their defaults. The sequence is not atomic: if the
    /// re-create fails, the dataset stays deleted and the error says so.
    pub async fn clear_dataset(&self, id: &str) -> Result<()> {
        let endpoint = dataset_endpoint(id);
        let failed = |step: ClearStep| {
            move |source: ManageError| ManageError::Clear {
                step,
                dataset: id.to_string(),
                source: Box::new(source),
            }
        };

        let dataset = self
            .get_dataset(id)
            .await
            .map_err(failed(ClearStep::Inspect))?;

        let options = DeleteDatasetOptions {
            recursive: true,
            force: true,
        };
        self.request(
            Method::DELETE,
            &endpoint,
            Some(encode_body(&options)?),
        )
        .await
        .map_err(failed(ClearStep::Delete))?;

        let request = CreateDatasetRequest {
            name: dataset.id.clone(),
            kind: dataset.kind.clone(),
            refquota: None,
        };
        if let Err(e) = self
            .request(
                Method::POST,
                "/pool/dataset",
                Some(encode_body(&request)?),
            )
            .await
        {
            error!("Dataset {} was deleted but could not be re-created: {}", id, e);
            return Err(failed(ClearStep::Recreate)(e));
        }

        info!("Cleared dataset {}", id);
        Ok(())
    }

    /// Create an NFS share. The share is always created enabled.
    ///
    /// Returns the share ID assigned by the server.
    pub async fn create_nfs_share(&self, mut share: NfsShare) -> Result<i64> {
        share.enabled = true;
        share.id = None;

        let created: CreatedShare = self
            .execute(
                Method::POST,
                "/sharing/nfs",
                Some(encode_body(&share)?),
            )
            .await?;
        info!("Created NFS share {} for {}", created.id, share.path);
        Ok(created.id)
    }

    pub async fn list_nfs_shares(&self) -> Result<Vec<NfsShare>> {
        self.execute(Method::GET, "/sharing/nfs", None).await
    }

    pub async fn delete_nfs_share(&self, id: i64) -> Result<()> {
        self.request(Method::DELETE, &format!("/sharing/nfs/id/{}", id), None)
            .await?;
        info!("Deleted NFS share {}", id);
        Ok(())
    }
}

/// Only the assigned ID matters from a create response
#[derive(Deserialize)]
struct CreatedShare {
    id: i64,
}

/// JSON request body; a value that cannot be represented is an `Encode` error
pub fn encode_body<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(ManageError::Encode)
}

/// `/pool/dataset/id/{id}` with the ID escaped as a single path segment
pub fn dataset_endpoint(id: &str) -> String {
    format!("/pool/dataset/id/{}", urlencoding::encode(id))
}

/// Keep datasets whose pool or ID is `pool`, or whose ID is under `pool/`
pub fn filter_pool(datasets: Vec<Dataset>, pool: &str) -> Vec<Dataset> {
    datasets
        .into_iter()
        .filter(|ds| ds.belongs_to_pool(pool))
        .collect()
}

/// `refquota` for a size given in GiB; `None` for zero or negative sizes
pub fn quota_bytes(quota_gb: i64) -> Result<Option<u64>> {
    if quota_gb <= 0 {
        return Ok(None);
    }
    (quota_gb as u64)
        .checked_mul(GIB)
        .map(Some)
        .ok_or_else(|| ManageError::Validation(format!("quota of {} GiB is too large", quota_gb)))
}
