use async_trait::async_trait;
use crypto_return_core::models::symbol::Symbol;
use reqwest::Client;
use std::time::Duration;

use super::SeriesSource;
use crate::errors::SourceError;

/// Fetches series files over HTTP from `<base_url>/<stem>.json`.
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, symbol: Symbol) -> String {
        format!("{}/{}.json", self.base_url, symbol.file_stem())
    }
}

#[async_trait]
impl SeriesSource for HttpSource {
    fn name(&self) -> &str {
        "HTTP"
    }

    async fn fetch_series(&self, symbol: Symbol) -> Result<String, SourceError> {
        let url = self.url_for(symbol);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                url,
                status: status.as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}
