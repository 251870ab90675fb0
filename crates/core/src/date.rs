/// Keep only the date part of an ISO-8601 timestamp.
///
/// `"2024-12-01T00:00:00"` becomes `"2024-12-01"`; strings without a `T`
/// separator come back unchanged and absent input yields `""`.
pub fn format_filing_date(date: Option<&str>) -> String {
    match date {
        Some(s) => match s.split_once('T') {
            Some((day, _)) => day.to_string(),
            None => s.to_string(),
        },
        None => String::new(),
    }
}
