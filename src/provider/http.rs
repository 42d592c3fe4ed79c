use std::time::Duration;

use reqwest::Client;
use tracing::info;
use url::Url;

use crate::{configuration::Config, error::Error, types::ScanCache};

/// Loads the snapshot cache from its configured source, either an
/// HTTP(S) URL or a local file path. One load per process lifetime; a
/// failure here is fatal for the session.
#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
}

impl HTTP {
    pub fn new(config: Config) -> Self {
        HTTP { config }
    }

    pub async fn get_cache(&self) -> Result<ScanCache, Error> {
        let source = &self.config.cache_source;
        let data = if is_remote(source) {
            self.fetch(source).await?
        } else {
            self.read_file(source).await?
        };

        ScanCache::from_slice(&data)
            .map_err(|e| Error::CacheLoadError(e.to_string()))
    }

    async fn fetch(&self, source: &str) -> Result<Vec<u8>, Error> {
        let url = Url::parse(source)?;
        info!("loading snapshot cache from {}", url);

        let client = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout))
            .build()?;
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::CacheLoadError(format!(
                "{} returned {}",
                source,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn read_file(&self, source: &str) -> Result<Vec<u8>, Error> {
        info!("loading snapshot cache from file {}", source);
        tokio::fs::read(source).await.map_err(|e| {
            Error::CacheLoadError(format!("{}: {}", source, e))
        })
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguishes_urls_from_file_paths() {
        assert!(is_remote("https://example.com/cache_data.json"));
        assert!(is_remote("http://localhost:9000/cache_data.json"));
        assert!(!is_remote("./cache_data.json"));
        assert!(!is_remote("/var/data/cache_data.json"));
    }
}
