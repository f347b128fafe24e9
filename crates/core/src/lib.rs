use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bounds imposed by the reporting API on a single query.
pub const MAX_METRICS_PER_QUERY: usize = 10;
pub const MAX_DIMENSIONS_PER_QUERY: usize = 7;

/// A named group of metrics, dimensions and sort order queried together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub metric: Vec<String>,
    #[serde(default)]
    pub dimension: Vec<String>,
    #[serde(default)]
    pub sort: Vec<String>,
}

impl MetricSpec {
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.metric.is_empty() {
            return Err(SpecError::NoMetrics);
        }
        if self.metric.len() > MAX_METRICS_PER_QUERY {
            return Err(SpecError::TooManyMetrics(self.metric.len()));
        }
        if self.dimension.len() > MAX_DIMENSIONS_PER_QUERY {
            return Err(SpecError::TooManyDimensions(self.dimension.len()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    NoMetrics,
    TooManyMetrics(usize),
    TooManyDimensions(usize),
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMetrics => write!(f, "metric set has no metrics"),
            Self::TooManyMetrics(count) => {
                write!(f, "{count} metrics exceeds the query limit of {MAX_METRICS_PER_QUERY}")
            }
            Self::TooManyDimensions(count) => write!(
                f,
                "{count} dimensions exceeds the query limit of {MAX_DIMENSIONS_PER_QUERY}"
            ),
        }
    }
}

impl std::error::Error for SpecError {}

/// Role a report column plays: dimensions form the row identity, metrics
/// carry the measured values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Dimension,
    Metric,
}

impl ColumnRole {
    /// Anything the remote does not label a dimension is treated as a
    /// metric; only dimensions take part in the uniqueness key.
    pub fn from_wire(value: &str) -> Self {
        if value == "DIMENSION" {
            Self::Dimension
        } else {
            Self::Metric
        }
    }
}

/// Declared value type of a report column as reported by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportDataType {
    String,
    Integer,
    Percent,
    Time,
    Float,
    Other,
}

impl ReportDataType {
    pub fn from_wire(value: &str) -> Self {
        match value {
            "STRING" => Self::String,
            "INTEGER" => Self::Integer,
            "PERCENT" => Self::Percent,
            "TIME" => Self::Time,
            "FLOAT" => Self::Float,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportColumn {
    pub name: String,
    pub role: ColumnRole,
    pub data_type: ReportDataType,
}

/// One page of a report query response. Row values are strings aligned to
/// `columns`; typing happens at the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub columns: Vec<ReportColumn>,
    pub rows: Vec<Vec<String>>,
    pub items_per_page: u32,
    pub has_more: bool,
}

/// Aggregation window a stored row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Month { year: i32, month: u32 },
    Day(NaiveDate),
    Today,
}

impl Period {
    pub fn key(&self) -> String {
        match self {
            Self::Month { year, month } => format!("month_{year:04}_{month:02}"),
            Self::Day(date) => format!("daily_{}", date.format("%Y_%m_%d")),
            Self::Today => "today".to_string(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}
