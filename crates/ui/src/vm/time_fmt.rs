use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y %H:%M").to_string()
}

/// Formats an optional timestamp, `—` when missing.
#[must_use]
pub fn format_optional_datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "—".to_string(), format_datetime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::fixed_now;

    #[test]
    fn formats_short_human_date() {
        assert_eq!(format_datetime(fixed_now()), "Nov 14, 2023 22:13");
        assert_eq!(format_optional_datetime(None), "—");
    }
}
