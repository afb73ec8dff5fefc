use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Admission region. The leading digit of an institute code identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Amravati,
    Aurangabad,
    Mumbai,
    Nagpur,
    Nashik,
    Pune,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Amravati,
        Region::Aurangabad,
        Region::Mumbai,
        Region::Nagpur,
        Region::Nashik,
        Region::Pune,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Amravati => "Amravati",
            Region::Aurangabad => "Aurangabad",
            Region::Mumbai => "Mumbai",
            Region::Nagpur => "Nagpur",
            Region::Nashik => "Nashik",
            Region::Pune => "Pune",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Region::Amravati => "1",
            Region::Aurangabad => "2",
            Region::Mumbai => "3",
            Region::Nagpur => "4",
            Region::Nashik => "5",
            Region::Pune => "6",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown region: {}", wanted))
    }
}

/// Institute-code prefix for a region name; `None` for names outside the table.
pub fn region_prefix(region_name: &str) -> Option<&'static str> {
    region_name.parse::<Region>().ok().map(|r| r.prefix())
}

/// True when the code starts with the prefix of any named region.
/// An empty name set places no restriction.
pub fn matches_region(institute_code: &str, region_names: &BTreeSet<String>) -> bool {
    if region_names.is_empty() {
        return true;
    }
    let code = institute_code.trim();
    region_names
        .iter()
        .filter_map(|name| region_prefix(name))
        .any(|prefix| code.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_prefix_table() {
        assert_eq!(region_prefix("Amravati"), Some("1"));
        assert_eq!(region_prefix("pune"), Some("6"));
        assert_eq!(region_prefix(" Mumbai "), Some("3"));
        assert_eq!(region_prefix("Atlantis"), None);
    }

    #[test]
    fn test_empty_region_set_matches_everything() {
        assert!(matches_region("6006", &BTreeSet::new()));
        assert!(matches_region("", &BTreeSet::new()));
    }

    #[test]
    fn test_any_listed_region_matches() {
        let selected = names(&["Pune", "Nagpur"]);
        assert!(matches_region("6006", &selected));
        assert!(matches_region("4115", &selected));
        assert!(!matches_region("3012", &selected));
    }

    #[test]
    fn test_unknown_names_match_nothing() {
        assert!(!matches_region("6006", &names(&["Atlantis"])));
    }
}
