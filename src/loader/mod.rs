//! Data Loader
//!
//! Fetches the hospital CSV feed and the department boundary file:
//! - HTTP(S) feed via reqwest
//! - Local files via tokio::fs
//!
//! A single attempt is made for each source; failures surface to the caller.

mod boundaries;
mod csv_reader;

pub use boundaries::Boundaries;
pub use csv_reader::{read_records, RawRecord};

#[cfg(test)]
pub(crate) use boundaries::tests::SAMPLE_GEOJSON;

use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::config::SourceConfig;
use crate::dataset::{DataError, DataResult};

/// A place raw bytes can be fetched from
#[async_trait]
pub trait DataSource: Send + Sync {
    /// URL or path, for logs and error messages
    fn describe(&self) -> String;

    /// Fetch the full contents
    async fn fetch(&self) -> DataResult<Vec<u8>>;
}

/// Remote resource fetched over HTTP(S)
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> DataResult<Self> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::unavailable(&url, e))?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> DataResult<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DataError::unavailable(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::unavailable(
                &self.url,
                format!("HTTP status {}", status),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DataError::unavailable(&self.url, e))?;

        Ok(body.to_vec())
    }
}

/// Local file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DataSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> DataResult<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| DataError::unavailable(self.describe(), e))
    }
}

/// Pick HTTP for `http://` / `https://` locations, a local file otherwise
pub fn source_for(location: &str, timeout: Duration) -> DataResult<Box<dyn DataSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Everything the loader produces
#[derive(Debug)]
pub struct RawData {
    pub records: Vec<RawRecord>,
    pub boundaries: Boundaries,
}

/// Fetch and parse both sources described by the configuration
pub async fn load(config: &SourceConfig) -> DataResult<RawData> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let boundary_source = source_for(&config.geojson_path, timeout)?;
    let csv_source = source_for(&config.csv_url, timeout)?;

    load_from(boundary_source.as_ref(), csv_source.as_ref()).await
}

/// Fetch and parse from explicit sources
pub async fn load_from(
    boundary_source: &dyn DataSource,
    csv_source: &dyn DataSource,
) -> DataResult<RawData> {
    let start = Instant::now();
    tracing::info!("Loading department boundaries from {}", boundary_source.describe());
    let boundaries = Boundaries::from_slice(&boundary_source.fetch().await?)?;
    tracing::info!("Loaded {} department boundaries", boundaries.len());

    tracing::info!("Fetching hospital data from {}", csv_source.describe());
    let bytes = csv_source.fetch().await?;
    let records = read_records(&bytes)?;

    tracing::info!(
        "Fetched {} bytes, {} rows in {:?}",
        bytes.len(),
        records.len(),
        start.elapsed()
    );

    Ok(RawData {
        records,
        boundaries,
    })
}
