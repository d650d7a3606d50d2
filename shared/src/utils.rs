// Text, number and date helpers shared by the engine and the CLI.

pub mod text {
    /// Decodes the handful of HTML entities the news crawler leaves in titles and bodies.
    /// `&amp;` goes last so `&amp;lt;` decodes to the literal `&lt;`.
    pub fn html_decode(s: &str) -> String {
        if s.is_empty() {
            return String::new();
        }
        s.replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&apos;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    /// Case-insensitive substring test.
    pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
        haystack.to_lowercase().contains(needle_lower)
    }

}

pub mod korean_format {
    use chrono::{DateTime, NaiveDateTime, Utc};

    const EOK: f64 = 100_000_000.0;

    /// Converts a won amount to 억 units, e.g. for chart series.
    pub fn to_eok(amount: f64) -> f64 {
        amount / EOK
    }

    /// "1,234억" style label, rounded to the nearest 억 with halves going up.
    pub fn format_eok(amount: f64) -> String {
        let rounded = (to_eok(amount) + 0.5).floor() as i64;
        format!("{}억", group_thousands(rounded))
    }

    pub fn group_thousands(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        if value < 0 {
            out.insert(0, '-');
        }
        out
    }

    /// Parses the date formats the backend has been seen to emit.
    pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// "방금 전" under an hour, "n시간 전" under a day, otherwise "YYYY.MM.DD".
    /// Unparseable input is returned unchanged.
    pub fn format_relative(date_str: &str, now: DateTime<Utc>) -> String {
        let Some(date) = parse_timestamp(date_str) else {
            return date_str.to_string();
        };
        let hours = (now - date).num_seconds() as f64 / 3600.0;
        if hours < 1.0 {
            "방금 전".to_string()
        } else if hours < 24.0 {
            format!("{}시간 전", hours.floor() as i64)
        } else {
            date.format("%Y.%m.%d").to_string()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Duration, TimeZone};

        fn now() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 11, 20, 12, 0, 0).unwrap()
        }

        #[test]
        fn test_format_eok_rounds_and_groups() {
            assert_eq!(format_eok(123_456_000_000.0), "1,235억");
            assert_eq!(format_eok(0.0), "0억");
        }

        #[test]
        fn test_format_eok_halves_round_up() {
            assert_eq!(format_eok(250_000_000.0), "3억");
            assert_eq!(format_eok(-250_000_000.0), "-2억");
            assert_eq!(format_eok(-1_250_000_000.0), "-12억");
            assert_eq!(format_eok(-260_000_000.0), "-3억");
        }

        #[test]
        fn test_group_thousands() {
            assert_eq!(group_thousands(999), "999");
            assert_eq!(group_thousands(1000), "1,000");
            assert_eq!(group_thousands(-1234567), "-1,234,567");
        }

        #[test]
        fn test_format_relative_recent() {
            let date = (now() - Duration::minutes(10)).to_rfc3339();
            assert_eq!(format_relative(&date, now()), "방금 전");
        }

        #[test]
        fn test_format_relative_hours() {
            let date = (now() - Duration::minutes(190)).to_rfc3339();
            assert_eq!(format_relative(&date, now()), "3시간 전");
        }

        #[test]
        fn test_format_relative_old_date() {
            assert_eq!(format_relative("2025-11-02 09:30:00", now()), "2025.11.02");
        }

        #[test]
        fn test_format_relative_unparseable() {
            assert_eq!(format_relative("어제", now()), "어제");
        }

        #[test]
        fn test_parse_timestamp_rfc2822() {
            let dt = parse_timestamp("Thu, 20 Nov 2025 10:00:00 +0900").unwrap();
            assert_eq!(dt, Utc.with_ymd_and_hms(2025, 11, 20, 1, 0, 0).unwrap());
        }
    }
}
