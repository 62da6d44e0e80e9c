use chrono::{NaiveDateTime, Timelike};

/// The only accepted input format for event dates (`YYYY-MM-DD HH:mm`).
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parses an event date under the exact `YYYY-MM-DD HH:mm` format.
///
/// chrono accepts unpadded fields such as `2030-1-5 9:00`; the round-trip
/// comparison rejects them so only the zero-padded form is valid.
pub fn parse_event_date(raw: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(raw, EVENT_DATE_FORMAT).ok()?;
    (parsed.format(EVENT_DATE_FORMAT).to_string() == raw).then_some(parsed)
}

/// Drops seconds and sub-second precision.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_second(0)
        .and_then(|v| v.with_nanosecond(0))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_exact_format() {
        let parsed = parse_event_date("2999-01-01 20:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2999, 1, 1)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_other_layouts() {
        for raw in [
            "2999-1-1 20:00",
            "2999-01-01",
            "2999-01-01T20:00",
            "2999-01-01 20:00:00",
            "01/01/2999 20:00",
            "2999-02-30 10:00",
            "2999-01-01 25:00",
            "",
        ] {
            assert!(parse_event_date(raw).is_none(), "{raw} should be rejected");
        }
    }

    #[test]
    fn truncation_keeps_the_minute() {
        let value = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_milli_opt(13, 45, 59, 999)
            .unwrap();
        let truncated = truncate_to_minute(value);
        assert_eq!(truncated.minute(), 45);
        assert_eq!(truncated.second(), 0);
        assert_eq!(truncated.nanosecond(), 0);
    }
}
