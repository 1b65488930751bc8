//! Remote table service client
//!
//! A thin typed client for a hosted REST table service exposing
//! `rest/v1/{table}` endpoints with PostgREST-style filters:
//!
//! - `GET  rest/v1/{table}?{col}=eq.{value}&select=*&order={col}.desc`
//! - `POST rest/v1/{table}` with `Prefer: return=representation`
//! - `POST rest/v1/{table}?on_conflict={col}` with
//!   `Prefer: resolution=merge-duplicates` for upserts
//! - `PATCH rest/v1/{table}?{col}=eq.{value}`
//! - `DELETE rest/v1/{table}?{col}=eq.{value}`
//!
//! Reads are retried a fixed number of times with no backoff; writes
//! are never retried.

use anyhow::{bail, Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};

/// Build an equality filter pair for a select/update/delete query
pub fn eq(column: &str, value: &str) -> (String, String) {
    (column.to_string(), format!("eq.{}", value))
}

/// Build an ordering pair (`order={col}.asc|desc`)
pub fn order(column: &str, descending: bool) -> (String, String) {
    let dir = if descending { "desc" } else { "asc" };
    ("order".to_string(), format!("{}.{}", column, dir))
}

/// Client for the hosted table service
pub struct RemoteTables {
    client: reqwest::Client,
    base_url: String,
    read_retries: u32,
}

impl std::fmt::Debug for RemoteTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTables")
            .field("base_url", &self.base_url)
            .field("read_retries", &self.read_retries)
            .finish()
    }
}

impl RemoteTables {
    /// Create a new remote table client
    ///
    /// The API key (when present) is sent both as `apikey` and as a
    /// bearer token, which is what the hosted service expects for
    /// anonymous access.
    pub fn new(base_url: &str, api_key: Option<&str>, read_retries: u32) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = api_key {
            let key_value =
                HeaderValue::from_str(key).context("Invalid characters in remote API key")?;
            headers.insert("apikey", key_value);
            let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
                .context("Invalid characters in remote API key")?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client for remote table service")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            read_retries,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Check that the service is reachable
    pub async fn ping(&self) -> Result<()> {
        let response = self
            .client
            .get(self.table_url("blog_posts"))
            .query(&[("select", "id"), ("limit", "1")])
            .send()
            .await
            .context("Remote table service unreachable")?;

        if response.status().is_server_error() {
            bail!("Remote table service returned {}", response.status());
        }

        Ok(())
    }

    /// Select rows from a table
    ///
    /// `query` holds already-formatted filter pairs (see [`eq`] and
    /// [`order`]); `select=*` is added automatically. Failed reads are
    /// retried up to the configured count, with no backoff.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>> {
        let mut last_err = None;

        for attempt in 0..=self.read_retries {
            match self.select_once(table, query).await {
                Ok(rows) => return Ok(rows),
                Err(e) => {
                    if attempt < self.read_retries {
                        tracing::warn!(
                            table,
                            attempt = attempt + 1,
                            "Remote read failed, retrying: {}",
                            e
                        );
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Remote read failed")))
    }

    async fn select_once<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to read from remote table '{}'", table))?;

        Self::parse_rows(response, table).await
    }

    /// Insert a row and return the created representation
    pub async fn insert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .with_context(|| format!("Failed to insert into remote table '{}'", table))?;

        Self::parse_rows(response, table).await
    }

    /// Upsert a row keyed on `on_conflict` and return the representation
    pub async fn upsert<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
        on_conflict: &str,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .post(self.table_url(table))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(row)
            .send()
            .await
            .with_context(|| format!("Failed to upsert into remote table '{}'", table))?;

        Self::parse_rows(response, table).await
    }

    /// Update rows matching the filters and return the representations
    pub async fn update<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(String, String)],
        patch: &B,
    ) -> Result<Vec<T>> {
        let response = self
            .client
            .patch(self.table_url(table))
            .query(filters)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await
            .with_context(|| format!("Failed to update remote table '{}'", table))?;

        Self::parse_rows(response, table).await
    }

    /// Delete rows matching the filters
    pub async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<()> {
        let response = self
            .client
            .delete(self.table_url(table))
            .query(filters)
            .send()
            .await
            .with_context(|| format!("Failed to delete from remote table '{}'", table))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Remote table '{}' returned {}: {}", table, status, body);
        }

        Ok(())
    }

    async fn parse_rows<T: DeserializeOwned>(
        response: reqwest::Response,
        table: &str,
    ) -> Result<Vec<T>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Remote table '{}' returned {}: {}", table, status, body);
        }

        response
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("Failed to decode rows from remote table '{}'", table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter_format() {
        assert_eq!(
            eq("slug", "hello-world"),
            ("slug".to_string(), "eq.hello-world".to_string())
        );
    }

    #[test]
    fn test_order_format() {
        assert_eq!(
            order("created_at", true),
            ("order".to_string(), "created_at.desc".to_string())
        );
        assert_eq!(
            order("display_order", false),
            ("order".to_string(), "display_order.asc".to_string())
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let tables = RemoteTables::new("https://tables.example.com/", Some("key"), 2).unwrap();
        assert_eq!(
            tables.table_url("blog_posts"),
            "https://tables.example.com/rest/v1/blog_posts"
        );
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = RemoteTables::new("https://tables.example.com", Some("bad\nkey"), 2);
        assert!(result.is_err());
    }

    #[tokio::test]
    #[ignore = "Requires remote table service"]
    async fn test_live_select() {
        let url = std::env::var("FOLIO_REMOTE_TEST_URL")
            .unwrap_or_else(|_| "http://localhost:54321".to_string());
        let key = std::env::var("FOLIO_REMOTE_TEST_KEY").ok();

        let tables = RemoteTables::new(&url, key.as_deref(), 2).unwrap();
        let rows: Vec<serde_json::Value> = tables
            .select("blog_posts", &[order("created_at", true)])
            .await
            .expect("select should succeed");
        assert!(rows.iter().all(|r| r.get("id").is_some()));
    }
}
