use std::time::Duration;

use reqwest::{redirect, Client};
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::extract::Extractor;
use crate::record::NewsRecord;

const USER_AGENT: &str = concat!("newswatch/", env!("CARGO_PKG_VERSION"));

pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .redirect(redirect::Policy::limited(5))
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Downloads the watched page and extracts its candidate records.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    url: Url,
    extractor: Extractor,
}

impl PageFetcher {
    pub fn new(client: Client, url: Url, extractor: Extractor) -> Self {
        Self {
            client,
            url,
            extractor,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch_page(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching page");
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_records(&self) -> Result<Vec<NewsRecord>, FetchError> {
        let html = self.fetch_page().await?;
        let records = self.extractor.extract(&html);
        if records.is_empty() {
            info!(url = %self.url, "no news items found on page");
        }
        Ok(records)
    }
}
