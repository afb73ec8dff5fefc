use crate::constants::is_all_sentinel;
use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One admission-cutoff entry as it appears in the dataset collection.
///
/// `rank` and `percentile` are independent: an absent value means the record
/// does not take part in that filter dimension, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Institute", default, deserialize_with = "lenient::text")]
    pub institute: String,
    #[serde(rename = "Institute Code", default, deserialize_with = "lenient::text")]
    pub institute_code: String,
    #[serde(rename = "Branch", default, deserialize_with = "lenient::text")]
    pub branch: String,
    #[serde(rename = "Seat Type", default, deserialize_with = "lenient::text")]
    pub seat_type: String,
    #[serde(
        rename = "Rank",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rank: Option<f64>,
    #[serde(
        rename = "Percentile",
        default,
        deserialize_with = "lenient::number",
        skip_serializing_if = "Option::is_none"
    )]
    pub percentile: Option<f64>,
}

/// Governance category of an institute, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollegeType {
    #[serde(rename = "Government-Autonomous")]
    GovernmentAutonomous,
    Government,
    Autonomous,
    Aided,
    Unaided,
    Other,
}

impl CollegeType {
    pub const ALL: [CollegeType; 6] = [
        CollegeType::GovernmentAutonomous,
        CollegeType::Government,
        CollegeType::Autonomous,
        CollegeType::Aided,
        CollegeType::Unaided,
        CollegeType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollegeType::GovernmentAutonomous => "Government-Autonomous",
            CollegeType::Government => "Government",
            CollegeType::Autonomous => "Autonomous",
            CollegeType::Aided => "Aided",
            CollegeType::Unaided => "Unaided",
            CollegeType::Other => "Other",
        }
    }
}

impl fmt::Display for CollegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollegeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CollegeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown college type: {}", wanted))
    }
}

/// Which cutoff the threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Threshold is the candidate's rank; lower is better.
    Rank,
    /// Threshold is the candidate's percentile, in [0, 100].
    Percentile,
}

impl ThresholdMode {
    pub fn label(&self) -> &'static str {
        match self {
            ThresholdMode::Rank => "Rank",
            ThresholdMode::Percentile => "Percentile",
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rank" => Ok(ThresholdMode::Rank),
            "percentile" => Ok(ThresholdMode::Percentile),
            other => Err(ValidationError::UnknownMode(other.to_string())),
        }
    }
}

/// Upper bound on the number of ranked results kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Limit {
    #[default]
    All,
    Count(usize),
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::All => f.write_str("all"),
            Limit::Count(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Limit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Limit::All);
        }
        trimmed
            .parse::<usize>()
            .map(Limit::Count)
            .map_err(|_| ValidationError::InvalidLimit(trimmed.to_string()))
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::All => serializer.serialize_str("all"),
            Limit::Count(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Count(u64),
            Keyword(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Count(n) => Ok(Limit::Count(n as usize)),
            Repr::Keyword(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Eligibility criteria for one predict action.
///
/// Empty categorical sets place no restriction. A set holding the "All"
/// sentinel behaves like an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(default)]
    pub seat_types: BTreeSet<String>,
    #[serde(default)]
    pub branches: BTreeSet<String>,
    #[serde(default)]
    pub college_types: BTreeSet<String>,
    #[serde(default)]
    pub regions: BTreeSet<String>,
    pub mode: ThresholdMode,
    pub threshold: f64,
    #[serde(default)]
    pub limit: Limit,
}

impl Criteria {
    pub fn new(mode: ThresholdMode, threshold: f64) -> Self {
        Self {
            seat_types: BTreeSet::new(),
            branches: BTreeSet::new(),
            college_types: BTreeSet::new(),
            regions: BTreeSet::new(),
            mode,
            threshold,
            limit: Limit::All,
        }
    }

    pub fn by_rank(rank: f64) -> Self {
        Self::new(ThresholdMode::Rank, rank)
    }

    pub fn by_percentile(percentile: f64) -> Self {
        Self::new(ThresholdMode::Percentile, percentile)
    }

    pub fn with_seat_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seat_types = selection(values);
        self
    }

    pub fn with_branches<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches = selection(values);
        self
    }

    pub fn with_college_types<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.college_types = selection(values);
        self
    }

    pub fn with_regions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = selection(values);
        self
    }

    pub fn with_limit(mut self, limit: Limit) -> Self {
        self.limit = limit;
        self
    }

    /// Checks the threshold against the selected mode.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.threshold.is_finite() {
            return Err(ValidationError::NonFiniteThreshold(self.threshold));
        }
        if self.mode == ThresholdMode::Percentile && !(0.0..=100.0).contains(&self.threshold) {
            return Err(ValidationError::PercentileOutOfRange(self.threshold));
        }
        self.selected_college_types()?;
        Ok(())
    }

    /// Parsed college type selection, or `None` when it does not restrict.
    /// Names are matched case-insensitively; an unknown name is rejected.
    pub fn selected_college_types(&self) -> Result<Option<BTreeSet<CollegeType>>, ValidationError> {
        if !restricts(&self.college_types) {
            return Ok(None);
        }
        self.college_types
            .iter()
            .map(|name| {
                name.parse::<CollegeType>()
                    .map_err(|_| ValidationError::UnknownCollegeType(name.trim().to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some)
    }

    /// Parses a threshold typed by the user.
    pub fn parse_threshold(text: &str) -> Result<f64, ValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingThreshold);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidThreshold(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(ValidationError::NonFiniteThreshold(value));
        }
        Ok(value)
    }
}

fn selection<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::into)
        .filter(|v: &String| !v.trim().is_empty())
        .collect()
}

/// True when the selection narrows the working set.
pub(crate) fn restricts(selection: &BTreeSet<String>) -> bool {
    !selection.is_empty() && !selection.iter().any(|v| is_all_sentinel(v))
}

/// Field decoders that accept the loose shapes spreadsheet exports produce.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(D::Error::custom(format!("expected text, found {}", other))),
        }
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let value = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(None),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("number out of range: {}", n)))?,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("expected a number, found \"{}\"", s)))?
            }
            other => return Err(D::Error::custom(format!("expected a number, found {}", other))),
        };
        if !value.is_finite() {
            return Err(D::Error::custom(format!("non-finite number: {}", value)));
        }
        Ok(Some(value))
    }
}
