use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::utils::TimeUtils;

/// One raw `[timestamp, value]` pair exactly as it arrives on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint(pub String, pub Option<f64>);

impl RawPoint {
    pub fn new(timestamp: impl Into<String>, value: Option<f64>) -> Self {
        Self(timestamp.into(), value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// Not a single timestamp in the raw input could be parsed
    NoParseableTimestamps { series: String, raw_points: usize },
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::NoParseableTimestamps { series, raw_points } => write!(
                f,
                "Series '{series}' is empty after cleaning: none of its {raw_points} timestamps could be parsed."
            ),
        }
    }
}

// ============================================================================
// TimeSeries: sorted, deduplicated timestamp -> value mapping
// ============================================================================

/// Keys are strictly increasing. A missing observation is `None`.
/// Never mutated after construction; alignment and lagging build new data.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    timestamps: Vec<NaiveDateTime>,
    values: Vec<Option<f64>>,
}

impl TimeSeries {
    /// Parse raw wire pairs. Unparseable timestamps are dropped, then the rest is
    /// sorted and deduplicated (first occurrence of a timestamp wins).
    pub fn build(name: &str, raw: &[RawPoint]) -> Result<Self, SeriesError> {
        let parsed: Vec<(NaiveDateTime, Option<f64>)> = raw
            .iter()
            .filter_map(|RawPoint(ts, value)| TimeUtils::parse_timestamp(ts).map(|t| (t, *value)))
            .collect();

        if parsed.is_empty() {
            return Err(SeriesError::NoParseableTimestamps {
                series: name.to_string(),
                raw_points: raw.len(),
            });
        }

        Ok(Self::from_points(name, parsed))
    }

    /// Build from already-parsed points. Same sort + dedupe rules as [`TimeSeries::build`].
    pub fn from_points(name: &str, mut points: Vec<(NaiveDateTime, Option<f64>)>) -> Self {
        // Stable sort so that among equal timestamps the original order survives
        points.sort_by_key(|(ts, _)| *ts);
        points.dedup_by_key(|(ts, _)| *ts);

        // NaN is how a missing value looks if it ever sneaks through as a number
        let (timestamps, values) = points
            .into_iter()
            .map(|(ts, v)| (ts, v.filter(|x| !x.is_nan())))
            .unzip();

        Self {
            name: name.to_string(),
            timestamps,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value observed at exactly `ts`. Outer `None`: no such timestamp.
    pub fn get(&self, ts: &NaiveDateTime) -> Option<Option<f64>> {
        self.timestamps
            .binary_search(ts)
            .ok()
            .map(|idx| self.values[idx])
    }
}

// ============================================================================
// RegressorPool: the candidate regressors of one search, in request order
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RegressorPool {
    series: Vec<TimeSeries>,
}

impl RegressorPool {
    pub fn new(series: Vec<TimeSeries>) -> Self {
        Self { series }
    }

    /// Parse every `(name, raw points)` entry. Fails on the first series with no usable timestamps.
    pub fn build(raw: &[(String, Vec<RawPoint>)]) -> Result<Self, SeriesError> {
        let series = raw
            .iter()
            .map(|(name, points)| TimeSeries::build(name, points))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(series))
    }

    pub fn names(&self) -> Vec<String> {
        self.series.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSeries> {
        self.series.iter()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(points: &[(&str, Option<f64>)]) -> Vec<RawPoint> {
        points.iter().map(|(ts, v)| RawPoint::new(*ts, *v)).collect()
    }

    #[test]
    fn build_sorts_and_keeps_first_duplicate() {
        let series = TimeSeries::build(
            "gdp",
            &raw(&[
                ("2020-03-01", Some(3.0)),
                ("2020-01-01", Some(1.0)),
                ("2020-03-01", Some(99.0)),
                ("2020-02-01", None),
            ]),
        )
        .unwrap();

        let ts: Vec<String> = series.timestamps().iter().map(TimeUtils::format_timestamp).collect();
        assert_eq!(
            ts,
            vec!["2020-01-01T00:00:00", "2020-02-01T00:00:00", "2020-03-01T00:00:00"]
        );
        assert_eq!(series.values(), &[Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn unparseable_timestamps_are_dropped() {
        let series = TimeSeries::build(
            "cpi",
            &raw(&[("garbage", Some(1.0)), ("2020-01-01", Some(2.0))]),
        )
        .unwrap();
        assert_eq!(series.timestamps().len(), 1);
        assert_eq!(series.values(), &[Some(2.0)]);
    }

    #[test]
    fn build_fails_when_nothing_parses() {
        let err = TimeSeries::build("cpi", &raw(&[("garbage", Some(1.0))])).unwrap_err();
        assert!(matches!(err, SeriesError::NoParseableTimestamps { .. }));
        assert!(err.to_string().contains("cpi"));

        assert!(TimeSeries::build("empty", &[]).is_err());
    }

    #[test]
    fn lookup_by_timestamp() {
        let series = TimeSeries::build("x", &raw(&[("2020-01-01", Some(5.0))])).unwrap();
        let hit = TimeUtils::parse_timestamp("2020-01-01").unwrap();
        let miss = TimeUtils::parse_timestamp("2020-01-02").unwrap();
        assert_eq!(series.get(&hit), Some(Some(5.0)));
        assert_eq!(series.get(&miss), None);
    }

    #[test]
    fn raw_points_deserialize_from_json_pairs() {
        let points: Vec<RawPoint> =
            serde_json::from_str(r#"[["2020-01-01", 1.5], ["2020-02-01", null]]"#).unwrap();
        assert_eq!(points[0], RawPoint::new("2020-01-01", Some(1.5)));
        assert_eq!(points[1], RawPoint::new("2020-02-01", None));
    }
}
