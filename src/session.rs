use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::export::ExportSnapshot;
use crate::filter::{filter, ResultSet};
use crate::model::{Criteria, Record};
use crate::paginate::{page, Page};
use crate::search::refine;
use crate::telemetry::PredictorMetrics;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// State of one predictor session.
///
/// The dataset is shared and never changes. Every action returns a new
/// `Session` built from the previous one, so a failed action leaves the
/// caller's state as it was.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<Dataset>,
    page_size: usize,
    criteria: Option<Criteria>,
    results: Arc<ResultSet>,
    view: Arc<ResultSet>,
    search_term: String,
    current_page: usize,
}

impl Session {
    pub fn new(dataset: Arc<Dataset>, page_size: usize) -> Self {
        Self {
            dataset,
            page_size: page_size.max(1),
            criteria: None,
            results: Arc::new(Vec::new()),
            view: Arc::new(Vec::new()),
            search_term: String::new(),
            current_page: 1,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn criteria(&self) -> Option<&Criteria> {
        self.criteria.as_ref()
    }

    /// Result set of the last predict action, before any search.
    pub fn results(&self) -> &[Record] {
        &self.results
    }

    /// Records currently shown: the results narrowed by the active search.
    pub fn view(&self) -> &[Record] {
        &self.view
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn has_prediction(&self) -> bool {
        self.criteria.is_some()
    }

    /// Runs the filter engine against the full dataset.
    ///
    /// An empty result is a valid outcome; only invalid criteria fail.
    #[instrument(skip(self, criteria), fields(mode = criteria.mode.label(), threshold = criteria.threshold))]
    pub fn predict(&self, criteria: Criteria) -> Result<Session, ValidationError> {
        let results = filter(self.dataset.records(), &criteria).map_err(|e| {
            PredictorMetrics::record_validation_rejected();
            warn!(error = %e, "Rejected criteria");
            e
        })?;

        PredictorMetrics::record_prediction(criteria.mode.label(), results.len());
        if results.is_empty() {
            info!("No colleges found matching the criteria");
        } else {
            info!(results = results.len(), "Prediction complete");
        }

        let results = Arc::new(results);
        Ok(Session {
            dataset: Arc::clone(&self.dataset),
            page_size: self.page_size,
            criteria: Some(criteria),
            view: Arc::clone(&results),
            results,
            search_term: String::new(),
            current_page: 1,
        })
    }

    /// Refines the last prediction's results. Never chains onto an earlier
    /// search, and always returns to page 1.
    pub fn search(&self, term: &str) -> Session {
        let view = if term.trim().is_empty() {
            Arc::clone(&self.results)
        } else {
            Arc::new(refine(&self.results, term))
        };
        PredictorMetrics::record_search(view.len());

        Session {
            view,
            search_term: term.to_string(),
            current_page: 1,
            ..self.clone()
        }
    }

    pub fn goto_page(&self, page_number: usize) -> Session {
        Session {
            current_page: page_number,
            ..self.clone()
        }
    }

    /// Moves forward one page unless already on the last.
    pub fn next_page(&self) -> Session {
        let current = self.page();
        if current.has_next {
            self.goto_page(self.current_page + 1)
        } else {
            self.clone()
        }
    }

    pub fn previous_page(&self) -> Session {
        if self.current_page > 1 {
            self.goto_page(self.current_page - 1)
        } else {
            self.clone()
        }
    }

    /// Drops criteria and results, keeping the loaded dataset.
    pub fn reset(&self) -> Session {
        Session::new(Arc::clone(&self.dataset), self.page_size)
    }

    pub fn page(&self) -> Page {
        page(&self.view, self.page_size, self.current_page)
    }

    /// Snapshot of the full prediction for export, or `None` before the
    /// first prediction. The active search does not narrow the export.
    pub fn export_snapshot(&self, title: &str) -> Option<ExportSnapshot> {
        let criteria = self.criteria.as_ref()?;
        Some(ExportSnapshot::new(title, criteria, &self.results, Utc::now()))
    }
}
