//! Names shared between the dataset, the filters and the report output.

// Dataset document defaults
pub const DEFAULT_DATASET_SOURCE: &str = "DSE-Engineering-College-List.json";
pub const DEFAULT_COLLECTION: &str = "MHT-CET College Data";

// Reporting convention
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const PAGE_WINDOW_RADIUS: usize = 2;

/// Selection meaning "no restriction" in the categorical filters.
pub const ALL_SENTINEL: &str = "All";

/// Placeholder for absent values in rendered rows.
pub const NOT_AVAILABLE: &str = "N/A";

pub const DEFAULT_EXPORT_TITLE: &str = "College Prediction Results";
pub const EXPORT_FILE_PREFIX: &str = "college-predictor-results";
pub const REPORT_FOOTER_BRAND: &str = "College Predictor";

/// True when a user selection is the "All" sentinel.
pub fn is_all_sentinel(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(ALL_SENTINEL)
}
