//! Remote catalog lookups.
//!
//! The engine only reaches back to the catalog for one thing: collection
//! artwork that was not part of the synced record itself.

use tracing::debug;

use crate::record::CatalogRecord;
use crate::CatalogError;

/// Read-only catalog lookups performed outside the synced record.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the full metadata record for a catalog item.
    async fn fetch_record(&self, remote_id: &str) -> Result<CatalogRecord, CatalogError>;

    /// List a section's collections as (collection index, remote id) pairs.
    async fn section_collections(
        &self,
        section_id: &str,
    ) -> Result<Vec<(String, String)>, CatalogError>;
}

/// HTTP catalog client speaking the catalog's JSON metadata endpoints.
pub struct HttpCatalog {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "catalog request");

        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.header("X-Catalog-Token", token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(CatalogError::Network(format!(
                "catalog returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| CatalogError::Decode(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl CatalogClient for HttpCatalog {
    async fn fetch_record(&self, remote_id: &str) -> Result<CatalogRecord, CatalogError> {
        self.get_json(&format!("/library/metadata/{remote_id}")).await
    }

    async fn section_collections(
        &self,
        section_id: &str,
    ) -> Result<Vec<(String, String)>, CatalogError> {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CollectionEntry {
            index: String,
            remote_id: String,
        }

        let entries: Vec<CollectionEntry> = self
            .get_json(&format!("/library/sections/{section_id}/collections"))
            .await?;
        Ok(entries
            .into_iter()
            .map(|e| (e.index, e.remote_id))
            .collect())
    }
}
