use crate::constants::ALL_SENTINEL;
use crate::error::LoadError;
use crate::model::{CollegeType, Record};
use crate::region::Region;
use crate::telemetry::PredictorMetrics;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Where the dataset document comes from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    /// Fetch the raw document bytes.
    async fn fetch(&self) -> Result<Vec<u8>, LoadError>;
}

/// Reads the dataset from the local filesystem.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Fetches the dataset over HTTP(S).
pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Picks an HTTP source for `http://` and `https://` locations, a file otherwise.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn DatasetSource>, LoadError> {
    let lower = location.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// The immutable record set for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Decodes the named collection of a dataset document. Any malformed
    /// entry fails the whole document.
    pub fn from_slice(bytes: &[u8], collection: &str) -> Result<Self, LoadError> {
        let mut document: Value = serde_json::from_slice(bytes)?;
        let entries = match document.get_mut(collection).map(Value::take) {
            Some(Value::Array(entries)) => entries,
            _ => return Err(LoadError::MissingCollection(collection.to_string())),
        };

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<Record>(entry).map_err(|e| LoadError::InvalidRecord {
                    index,
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct seat types in first-seen order.
    pub fn seat_types(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.seat_type.as_str()))
    }

    /// Distinct branches in first-seen order.
    pub fn branches(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.branch.as_str()))
    }

    /// College types offered for selection, led by the "All" sentinel.
    pub fn college_type_options() -> Vec<String> {
        std::iter::once(ALL_SENTINEL.to_string())
            .chain(
                [
                    CollegeType::Government,
                    CollegeType::Autonomous,
                    CollegeType::Aided,
                    CollegeType::Unaided,
                ]
                .iter()
                .map(|t| t.as_str().to_string()),
            )
            .collect()
    }

    pub fn region_options() -> Vec<String> {
        Region::ALL.iter().map(|r| r.name().to_string()).collect()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Loads the dataset once for a session. Either every record decodes or the
/// load fails; the caller decides whether to retry.
#[instrument(skip(source), fields(source = %source.describe()))]
pub async fn load_dataset(source: &dyn DatasetSource, collection: &str) -> Result<Dataset, LoadError> {
    let started = Instant::now();
    info!("Loading college data");

    let bytes = source.fetch().await?;
    debug!(bytes = bytes.len(), "Fetched dataset document");

    let dataset = Dataset::from_slice(&bytes, collection)?;
    let elapsed = started.elapsed().as_secs_f64();
    PredictorMetrics::record_dataset_loaded(dataset.len(), elapsed);
    info!(records = dataset.len(), elapsed_secs = elapsed, "Loaded college data");
    Ok(dataset)
}
