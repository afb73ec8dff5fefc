//! Admission cutoff predictor.
//!
//! Loads a static dataset of college admission cutoffs and answers "which
//! colleges can I get into" for a set of eligibility criteria: filter by seat
//! type, branch, college type and region, keep cutoffs the candidate's rank or
//! percentile clears, rank by percentile, then search, page and export.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod model;
pub mod paginate;
pub mod region;
pub mod search;
pub mod session;
pub mod telemetry;

pub use classifier::classify;
pub use dataset::{load_dataset, Dataset, DatasetSource, FileSource, HttpSource};
pub use error::{LoadError, PredictorError, Result, ValidationError};
pub use filter::{filter, ResultSet};
pub use model::{CollegeType, Criteria, Limit, Record, ThresholdMode};
pub use paginate::{page, Page};
pub use region::{matches_region, region_prefix, Region};
pub use search::refine;
pub use session::Session;
