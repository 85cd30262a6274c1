//! Serverless vector index client (Pinecone-compatible REST API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::VectorStoreError;
use crate::models::{Config, EMBEDDING_DIMENSION, UpsertRecord};

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

const REQUEST_TIMEOUT_SECS: u64 = 60;
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);
const READY_POLL_ATTEMPTS: usize = 60;

/// Vector index collaborator contract: insert-or-replace a batch of records
/// keyed by id. An error is fatal to the run.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<(), VectorStoreError>;
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
    #[serde(default)]
    status: IndexStatus,
}

#[derive(Debug, Default, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertRequest {
    vectors: Vec<UpsertRecord>,
}

/// Handle to a serverless index, connected to its data-plane host.
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    name: String,
    host: String,
}

impl PineconeIndex {
    /// Connect to the configured index, creating it (cosine metric, the
    /// embedding model's dimension, serverless cloud/region spec) when it
    /// does not exist, and waiting until it reports ready.
    pub async fn ensure(config: &Config) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let existing = describe_index(&client, &config.pinecone_api_key, &config.index_name).await?;

        if let Some(index) = &existing
            && index.status.ready
        {
            info!(index = %config.index_name, "index already exists, connecting");
            return Ok(Self {
                client,
                api_key: config.pinecone_api_key.clone(),
                name: config.index_name.clone(),
                host: index.host.clone(),
            });
        }

        if existing.is_none() {
            info!(index = %config.index_name, "index not found, creating");
            create_index(&client, config).await?;
        }

        let index = wait_until_ready(&client, &config.pinecone_api_key, &config.index_name).await?;
        info!(index = %config.index_name, host = %index.host, "index ready");

        Ok(Self {
            client,
            api_key: config.pinecone_api_key.clone(),
            name: config.index_name.clone(),
            host: index.host,
        })
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        debug!(count = records.len(), index = %self.name, "upserting batch");

        let url = format!("https://{}/vectors/upsert", self.host);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&UpsertRequest { vectors: records })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::UpsertError(format!(
                "status {status}: {body}"
            )));
        }

        Ok(())
    }
}

async fn describe_index(
    client: &Client,
    api_key: &str,
    name: &str,
) -> Result<Option<DescribeIndexResponse>, VectorStoreError> {
    let url = format!("{CONTROL_PLANE_URL}/indexes/{name}");
    let response = client.get(&url).header("Api-Key", api_key).send().await?;

    match response.status() {
        StatusCode::NOT_FOUND => Ok(None),
        status if status.is_success() => {
            let parsed = response
                .json()
                .await
                .map_err(|e| VectorStoreError::IndexError(e.to_string()))?;
            Ok(Some(parsed))
        }
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(VectorStoreError::IndexError(format!(
                "describe failed with status {status}: {body}"
            )))
        }
    }
}

async fn create_index(client: &Client, config: &Config) -> Result<(), VectorStoreError> {
    let request = CreateIndexRequest {
        name: &config.index_name,
        dimension: EMBEDDING_DIMENSION,
        metric: "cosine",
        spec: IndexSpec {
            serverless: ServerlessSpec {
                cloud: &config.cloud,
                region: &config.region,
            },
        },
    };

    let url = format!("{CONTROL_PLANE_URL}/indexes");
    let response = client
        .post(&url)
        .header("Api-Key", &config.pinecone_api_key)
        .json(&request)
        .send()
        .await?;

    // 409 means another run created the index first; describe will find it.
    if !response.status().is_success() && response.status() != StatusCode::CONFLICT {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(VectorStoreError::IndexError(format!(
            "create failed with status {status}: {body}"
        )));
    }

    Ok(())
}

async fn wait_until_ready(
    client: &Client,
    api_key: &str,
    name: &str,
) -> Result<DescribeIndexResponse, VectorStoreError> {
    for _ in 0..READY_POLL_ATTEMPTS {
        if let Some(index) = describe_index(client, api_key, name).await?
            && index.status.ready
        {
            return Ok(index);
        }
        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }

    Err(VectorStoreError::IndexError(format!(
        "index '{name}' did not become ready in time"
    )))
}
