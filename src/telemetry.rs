//! Predictor metrics
//!
//! Counters and histograms for dataset loads, predictions, searches and
//! exports. They go through the `metrics` facade and are no-ops unless the
//! embedding application installs a recorder.

/// Metrics emitted by the predictor core.
pub struct PredictorMetrics;

impl PredictorMetrics {
    pub fn record_dataset_loaded(records: usize, duration_secs: f64) {
        ::metrics::counter!("predictor_dataset_loads_total").increment(1);
        ::metrics::gauge!("predictor_dataset_records").set(records as f64);
        ::metrics::histogram!("predictor_dataset_load_duration_seconds").record(duration_secs);
    }

    pub fn record_prediction(mode: &'static str, results: usize) {
        ::metrics::counter!("predictor_predictions_total", "mode" => mode).increment(1);
        ::metrics::histogram!("predictor_prediction_results", "mode" => mode).record(results as f64);
        if results == 0 {
            ::metrics::counter!("predictor_empty_predictions_total", "mode" => mode).increment(1);
        }
    }

    pub fn record_validation_rejected() {
        ::metrics::counter!("predictor_validation_rejections_total").increment(1);
    }

    pub fn record_search(matches: usize) {
        ::metrics::counter!("predictor_searches_total").increment(1);
        ::metrics::histogram!("predictor_search_matches").record(matches as f64);
    }

    pub fn record_export(format: &'static str, rows: usize) {
        ::metrics::counter!("predictor_exports_total", "format" => format).increment(1);
        ::metrics::histogram!("predictor_export_rows").record(rows as f64);
    }
}
