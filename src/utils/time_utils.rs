use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    // Tried in order after RFC 3339 (which carries an offset and is normalised to UTC)
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

    /// Parse an ISO-8601-ish timestamp string into a naive UTC datetime.
    /// Returns `None` for anything we can't make sense of; callers drop those rows.
    pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
        let text = raw.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.naive_utc());
        }

        // "2020-01-31T00:00:00.000Z" style strings that RFC 3339 parsing rejected
        let text = text.strip_suffix('Z').unwrap_or(text);

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(dt);
            }
        }

        Self::DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Used for display purposes (logs, test fixtures)
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(Self::STANDARD_DATETIME_FORMAT).to_string()
    }
}
