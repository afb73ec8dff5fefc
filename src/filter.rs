use crate::classifier::classify_name;
use crate::error::ValidationError;
use crate::model::{restricts, CollegeType, Criteria, Limit, Record, ThresholdMode};
use crate::region::matches_region;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

/// Records that passed a filter run, best cutoff percentile first.
pub type ResultSet = Vec<Record>;

/// Applies `criteria` to `records` and returns the ranked result set.
///
/// The threshold is validated before any record is examined. Stages are
/// conjunctive, so their order only matters for the final sort and limit.
/// Records with equal percentile keep their input order; there is no
/// secondary sort key.
pub fn filter(records: &[Record], criteria: &Criteria) -> Result<ResultSet, ValidationError> {
    criteria.validate()?;
    let college_types = criteria.selected_college_types()?;

    let mut results: ResultSet = records
        .iter()
        .filter(|r| matches_seat_type(r, criteria))
        .filter(|r| matches_branch(r, criteria))
        .filter(|r| matches_college_type(r, college_types.as_ref()))
        .filter(|r| passes_threshold(r, criteria.mode, criteria.threshold))
        .filter(|r| !restricts(&criteria.regions) || matches_region(&r.institute_code, &criteria.regions))
        .cloned()
        .collect();

    debug!(
        matched = results.len(),
        scanned = records.len(),
        mode = criteria.mode.label(),
        "Filtered records"
    );

    results.sort_by(by_percentile_desc);

    if let Limit::Count(n) = criteria.limit {
        results.truncate(n);
    }

    Ok(results)
}

fn matches_seat_type(record: &Record, criteria: &Criteria) -> bool {
    !restricts(&criteria.seat_types) || criteria.seat_types.contains(&record.seat_type)
}

fn matches_branch(record: &Record, criteria: &Criteria) -> bool {
    !restricts(&criteria.branches) || criteria.branches.contains(&record.branch)
}

fn matches_college_type(record: &Record, selected: Option<&BTreeSet<CollegeType>>) -> bool {
    selected.map_or(true, |types| types.contains(&classify_name(&record.institute)))
}

/// A rank threshold qualifies for closing ranks at or above it; a percentile
/// threshold qualifies for cutoff percentiles at or below it. Records without
/// the relevant cutoff never qualify.
pub fn passes_threshold(record: &Record, mode: ThresholdMode, threshold: f64) -> bool {
    match mode {
        ThresholdMode::Rank => record.rank.is_some_and(|rank| threshold <= rank),
        ThresholdMode::Percentile => record.percentile.is_some_and(|p| threshold >= p),
    }
}

fn by_percentile_desc(a: &Record, b: &Record) -> Ordering {
    let pa = a.percentile.unwrap_or(0.0);
    let pb = b.percentile.unwrap_or(0.0);
    pb.total_cmp(&pa)
}
