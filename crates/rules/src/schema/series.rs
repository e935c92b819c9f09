//! Aggregation series and the function names on both sides of the mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation functions native to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationFunction {
    Avg,
    Card,
    Count,
    Max,
    Min,
    Stddev,
    Sum,
    SumOfSquares,
    Variance,
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregationFunction::Avg => "AVG",
            AggregationFunction::Card => "CARD",
            AggregationFunction::Count => "COUNT",
            AggregationFunction::Max => "MAX",
            AggregationFunction::Min => "MIN",
            AggregationFunction::Stddev => "STDDEV",
            AggregationFunction::Sum => "SUM",
            AggregationFunction::SumOfSquares => "SUMOFSQUARES",
            AggregationFunction::Variance => "VARIANCE",
        };
        f.write_str(name)
    }
}

/// Functions a user can pick for a statistical condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatisticalFunction {
    Mean,
    Min,
    Max,
    Sum,
    Stddev,
}

impl StatisticalFunction {
    pub fn to_engine(self) -> AggregationFunction {
        match self {
            StatisticalFunction::Mean => AggregationFunction::Avg,
            StatisticalFunction::Min => AggregationFunction::Min,
            StatisticalFunction::Max => AggregationFunction::Max,
            StatisticalFunction::Sum => AggregationFunction::Sum,
            StatisticalFunction::Stddev => AggregationFunction::Stddev,
        }
    }

    /// User-facing name of an engine function. `AVG` reads back as `MEAN`;
    /// every other function keeps its engine name.
    pub fn display_name(function: AggregationFunction) -> String {
        match function {
            AggregationFunction::Avg => "MEAN".to_string(),
            other => other.to_string(),
        }
    }
}

impl FromStr for StatisticalFunction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MEAN" => Ok(StatisticalFunction::Mean),
            "MIN" => Ok(StatisticalFunction::Min),
            "MAX" => Ok(StatisticalFunction::Max),
            "SUM" => Ok(StatisticalFunction::Sum),
            "STDDEV" => Ok(StatisticalFunction::Stddev),
            other => Err(format!("unknown statistical function: '{}'", other)),
        }
    }
}

/// One numeric aggregation over a field, referenced from the condition
/// expression by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationSeries {
    pub id: String,
    pub function: AggregationFunction,
    #[serde(default)]
    pub field: Option<String>,
}
