use crate::filter::ResultSet;
use crate::model::Record;

/// Narrows a filtered result set to records whose institute, branch or seat
/// type contains `term`, ignoring case.
///
/// Always call this with the base set from the last filter run. Refinements
/// do not chain, and a blank term returns the base unchanged. Relative order
/// is preserved, so callers should show page 1 of the returned set.
pub fn refine(base: &[Record], term: &str) -> ResultSet {
    if term.trim().is_empty() {
        return base.to_vec();
    }
    let needle = term.to_lowercase();
    base.iter()
        .filter(|record| matches_term(record, &needle))
        .cloned()
        .collect()
}

fn matches_term(record: &Record, needle: &str) -> bool {
    [&record.institute, &record.branch, &record.seat_type]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
