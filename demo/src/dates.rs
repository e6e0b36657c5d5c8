use chrono::NaiveDate;
use wikigraph_panel::DateFormatter;

/// Formats `YYYY-MM-DD` time keys as a readable date; anything else passes
/// through unchanged.
pub struct SnapshotDates;

impl DateFormatter for SnapshotDates {
    fn format_date(&self, key: &str) -> String {
        match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
            Ok(date) => date.format("%B %-d, %Y").to_string(),
            Err(_) => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_date_keys() {
        let dates = SnapshotDates;
        assert_eq!(dates.format_date("2020-01-05"), "January 5, 2020");
        assert_eq!(dates.format_date("2021-12-31"), "December 31, 2021");
    }

    #[test]
    fn passes_through_non_dates() {
        let dates = SnapshotDates;
        assert_eq!(dates.format_date("latest"), "latest");
    }
}
