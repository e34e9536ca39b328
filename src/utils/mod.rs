use chrono::NaiveDate;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

// leading-integer parse: "  12abc" -> 12, "abc" -> None
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

pub fn parse_positive_int(value: &str) -> Option<u64> {
    let n = parse_leading_int(value)?;
    if n < 1 {
        return None;
    }
    u64::try_from(n).ok()
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

pub fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_iso_date(value).ok_or_else(|| "expected a date in YYYY-MM-DD format".to_string())
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

fn is_digit_string(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// CSV cell for a stored mobile. Digit strings are written verbatim in the
/// spreadsheet formula form (`="0171..."`) so Excel keeps the leading zero;
/// anything else (a `_copy` marker) is an ordinary quoted cell.
pub fn format_mobile_for_export(mobile: &str) -> String {
    if is_digit_string(mobile) {
        format!("=\"{mobile}\"")
    } else {
        csv_quote(mobile)
    }
}

/// Undo [`format_mobile_for_export`] after CSV unquoting: `=0171...` -> `0171...`.
pub fn unwrap_spreadsheet_text(cell: &str) -> &str {
    match cell.strip_prefix('=') {
        Some(rest) if is_digit_string(rest) => rest,
        _ => cell,
    }
}

pub fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
