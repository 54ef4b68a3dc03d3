use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use estoque_core::errors::StoreError;
use estoque_core::types::{
    Ack, Count, CountPatch, CountReceipt, CountRow, NewCount, NewProduct, Product, Summary,
};

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the workflow asks of the external store. One method per
/// route; the store owns persistence, aggregation, and report rendering.
#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn create_product(&self, new: &NewProduct) -> Result<Product, StoreError>;
    async fn update_product(&self, id: i64, update: &NewProduct) -> Result<Product, StoreError>;
    async fn delete_product(&self, id: i64) -> Result<Ack, StoreError>;
    async fn product_by_code(&self, codigo: &str) -> Result<Product, StoreError>;

    async fn list_counts(&self) -> Result<Vec<Count>, StoreError>;
    async fn counts_for_product(&self, codigo: &str) -> Result<Vec<CountRow>, StoreError>;
    async fn create_count(&self, new: &NewCount) -> Result<CountReceipt, StoreError>;
    async fn update_count(&self, id: i64, patch: &CountPatch) -> Result<CountRow, StoreError>;
    async fn delete_count(&self, id: i64) -> Result<Ack, StoreError>;

    async fn summary(&self) -> Result<Summary, StoreError>;
    async fn report_pdf(&self) -> Result<Bytes, StoreError>;
    async fn report_xlsx(&self) -> Result<Bytes, StoreError>;
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Base path every route is appended to.
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

/// reqwest-backed store client. No retries: every transport failure is
/// terminal for the user action that triggered it.
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(config.connect_timeout)
                .build()
                .expect("failed to build HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and classify any failure. Request errors are logged
    /// here at the boundary and re-raised to the calling action, which owns
    /// user-visible presentation.
    async fn execute(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, StoreError> {
        let resp = req.send().await.map_err(|e| {
            let err = StoreError::Network(e.to_string());
            tracing::warn!(path, error = %err, "store request failed");
            err
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = StoreError::from_status(status.as_u16(), &body);
            tracing::warn!(path, status = status.as_u16(), kind = err.error_kind(), "store request failed");
            return Err(err);
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let resp = self.execute(path, self.client.get(self.url(path))).await?;
        decode_json(resp).await
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let req = self.client.post(self.url(path)).json(body);
        let resp = self.execute(path, req).await?;
        decode_json(resp).await
    }

    async fn put_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, StoreError> {
        let req = self.client.put(self.url(path)).json(body);
        let resp = self.execute(path, req).await?;
        decode_json(resp).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let resp = self
            .execute(path, self.client.delete(self.url(path)))
            .await?;
        decode_json(resp).await
    }

    async fn get_bytes(&self, path: &str) -> Result<Bytes, StoreError> {
        let resp = self.execute(path, self.client.get(self.url(path))).await?;
        resp.bytes()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, StoreError> {
    resp.json::<T>()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl StoreClient for HttpStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.get_json("/produtos").await
    }

    async fn create_product(&self, new: &NewProduct) -> Result<Product, StoreError> {
        self.post_json("/produtos", new).await
    }

    async fn update_product(&self, id: i64, update: &NewProduct) -> Result<Product, StoreError> {
        self.put_json(&format!("/produtos/{id}"), update).await
    }

    async fn delete_product(&self, id: i64) -> Result<Ack, StoreError> {
        self.delete_json(&format!("/produtos/{id}")).await
    }

    async fn product_by_code(&self, codigo: &str) -> Result<Product, StoreError> {
        self.get_json(&format!("/produtos/{codigo}")).await
    }

    async fn list_counts(&self) -> Result<Vec<Count>, StoreError> {
        self.get_json("/contagens").await
    }

    async fn counts_for_product(&self, codigo: &str) -> Result<Vec<CountRow>, StoreError> {
        self.get_json(&format!("/contagens/produto/{codigo}")).await
    }

    async fn create_count(&self, new: &NewCount) -> Result<CountReceipt, StoreError> {
        self.post_json("/contagens", new).await
    }

    async fn update_count(&self, id: i64, patch: &CountPatch) -> Result<CountRow, StoreError> {
        self.put_json(&format!("/contagens/{id}"), patch).await
    }

    async fn delete_count(&self, id: i64) -> Result<Ack, StoreError> {
        self.delete_json(&format!("/contagens/{id}")).await
    }

    async fn summary(&self) -> Result<Summary, StoreError> {
        self.get_json("/relatorio/resumo").await
    }

    async fn report_pdf(&self) -> Result<Bytes, StoreError> {
        self.get_bytes("/relatorio/pdf_novo").await
    }

    async fn report_xlsx(&self) -> Result<Bytes, StoreError> {
        self.get_bytes("/relatorio/excel_novo").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn url_joins_base_and_path() {
        let store = HttpStore::new(StoreConfig::default());
        assert_eq!(
            store.url("/produtos"),
            "http://localhost:5000/api/produtos"
        );
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let store = HttpStore::new(StoreConfig {
            base_url: "http://stock.local/api/".into(),
            ..StoreConfig::default()
        });
        assert_eq!(store.url("/contagens"), "http://stock.local/api/contagens");
    }

    #[test]
    fn path_encoding_of_ids() {
        let store = HttpStore::new(StoreConfig::default());
        assert_eq!(
            store.url(&format!("/produtos/{}", 42)),
            "http://localhost:5000/api/produtos/42"
        );
        assert_eq!(
            store.url(&format!("/contagens/produto/{}", "X1")),
            "http://localhost:5000/api/contagens/produto/X1"
        );
    }
}
