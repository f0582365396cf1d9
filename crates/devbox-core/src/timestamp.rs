use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Formats a timestamp as RFC 3339 for display, whole seconds only.
pub fn format_rfc3339(datetime: OffsetDateTime) -> String {
    let datetime = datetime.replace_nanosecond(0).unwrap_or(datetime);
    datetime
        .format(&Rfc3339)
        .unwrap_or_else(|_| datetime.unix_timestamp().to_string())
}
