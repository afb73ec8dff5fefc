use crate::constants::PAGE_WINDOW_RADIUS;
use crate::model::Record;
use serde::Serialize;

/// A bounded view over a result set plus the metadata needed to render
/// navigation controls. Page numbers are 1-based; `start`/`end` are 0-based
/// indices into the result set, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub records: Vec<Record>,
    pub start: usize,
    pub end: usize,
    pub total_results: usize,
    /// Zero for an empty result set.
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    /// Page numbers to offer as jump controls, centered on `current_page`.
    pub window: Vec<usize>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Slices `results` into the requested page.
///
/// An out-of-range page number (including 0) yields an empty slice rather
/// than an error. Such a page keeps the requested number as `current_page`
/// and offers no navigation. A page size of zero is treated as one.
pub fn page(results: &[Record], page_size: usize, page_number: usize) -> Page {
    let page_size = page_size.max(1);
    let total_results = results.len();
    let total_pages = total_pages(total_results, page_size);
    let current_page = if total_pages == 0 { 1 } else { page_number };

    let in_range = page_number >= 1 && page_number <= total_pages;
    let (start, end) = if in_range {
        let start = (page_number - 1) * page_size;
        (start, (start + page_size).min(total_results))
    } else {
        (0, 0)
    };

    Page {
        records: results[start..end].to_vec(),
        start,
        end,
        total_results,
        total_pages,
        current_page,
        page_size,
        has_previous: in_range && current_page > 1,
        has_next: in_range && current_page < total_pages,
        window: if in_range { window(current_page, total_pages) } else { Vec::new() },
    }
}

pub fn total_pages(total_results: usize, page_size: usize) -> usize {
    total_results.div_ceil(page_size.max(1))
}

/// Jump targets: up to two pages either side of `current`, within `1..=total`.
pub fn window(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    let first = current.saturating_sub(PAGE_WINDOW_RADIUS).max(1);
    let last = current.saturating_add(PAGE_WINDOW_RADIUS).min(total);
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                institute: format!("College {}", i),
                institute_code: "6006".to_string(),
                branch: "Computer Engineering".to_string(),
                seat_type: "GOPENS".to_string(),
                rank: Some(i as f64),
                percentile: Some(99.0),
            })
            .collect()
    }

    #[test]
    fn test_first_page_is_min_of_size_and_len() {
        assert_eq!(page(&results(45), 20, 1).records.len(), 20);
        assert_eq!(page(&results(7), 20, 1).records.len(), 7);
    }

    #[test]
    fn test_last_partial_page() {
        let p = page(&results(45), 20, 3);
        assert_eq!(p.total_pages, 3);
        assert_eq!((p.start, p.end), (40, 45));
        assert_eq!(p.records[0].institute, "College 40");
        assert!(p.has_previous);
        assert!(!p.has_next);
    }

    #[test]
    fn test_empty_result_set() {
        let p = page(&[], 20, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.current_page, 1);
        assert!(p.is_empty());
        assert!(!p.has_previous);
        assert!(!p.has_next);
        assert!(p.window.is_empty());
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let p = page(&results(45), 20, 9);
        assert!(p.is_empty());
        assert_eq!(p.total_results, 45);
        assert!(!p.has_next);
        assert!(page(&results(45), 20, 0).is_empty());
    }

    #[test]
    fn test_page_zero_reports_itself() {
        let p = page(&results(45), 20, 0);
        assert!(p.is_empty());
        assert_eq!(p.current_page, 0);
        assert_eq!(p.total_pages, 3);
        assert!(!p.has_previous);
        assert!(!p.has_next);
        assert!(p.window.is_empty());

        let past_end = page(&results(45), 20, 9);
        assert_eq!(past_end.current_page, 9);
        assert!(!past_end.has_previous);
        assert!(past_end.window.is_empty());
    }

    #[test]
    fn test_window_is_centered_and_clamped() {
        assert_eq!(window(1, 10), vec![1, 2, 3]);
        assert_eq!(window(5, 10), vec![3, 4, 5, 6, 7]);
        assert_eq!(window(10, 10), vec![8, 9, 10]);
        assert_eq!(window(2, 2), vec![1, 2]);
    }

    #[test]
    fn test_navigation_flags() {
        let p = page(&results(100), 20, 2);
        assert!(p.has_previous);
        assert!(p.has_next);
        assert_eq!(p.window, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let p = page(&results(3), 0, 2);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.records[0].institute, "College 1");
    }
}
