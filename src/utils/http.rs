use anyhow::Result;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, ClientBuilder};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::FetchError;
use crate::utils::cache::FileCache;

/// Source of raw page bytes.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// `None` for any non-2xx or redirect response, or a transport failure.
    async fn fetch(&self, url: &str) -> Option<Vec<u8>>;
}

/// Redirects are not followed, so a moved page surfaces as a 3xx status.
pub fn create_client(config: &Config) -> Result<Client> {
    let client = ClientBuilder::new()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .redirect(Policy::none())
        .build()?;

    Ok(client)
}

pub struct HttpFetcher {
    client: Client,
    cache: Option<FileCache>,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let cache = config
            .cache_enabled
            .then(|| FileCache::new(&config.cache_dir));

        Ok(Self {
            client: create_client(config)?,
            cache,
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Url::parse(url).map_err(|source| FetchError::Url {
            url: url.to_string(),
            source,
        })?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        if let Some(cache) = &self.cache {
            match cache.get(url).await {
                Ok(Some(bytes)) => return Some(bytes),
                Ok(None) => {}
                Err(e) => warn!("Cache read failed for {}: {}", url, e),
            }
        }

        info!("Fetching {}", url);
        match self.download(url).await {
            Ok(bytes) => {
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.put(url, &bytes).await {
                        warn!("Cache write failed for {}: {}", url, e);
                    }
                }
                Some(bytes)
            }
            Err(e) => {
                warn!("Treating {} as absent: {}", url, e);
                None
            }
        }
    }
}
