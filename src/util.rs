use std::str::FromStr;

pub fn positive_rate_parser(s: &str) -> Result<f64, String> {
    let s = s.trim();
    f64::from_str(s)
        .map_err(|e| format!("Invalid value '{}': {}", s, e))
        .and_then(|v| {
            if v <= 0.0 || !v.is_finite() {
                Err(format!("Value must be positive, got {}", v))
            } else {
                Ok(v)
            }
        })
}

/// Format a whole number of seconds as HH:MM:SS, hours not wrapped.
pub fn format_hms(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_rate_parser() {
        assert_eq!(positive_rate_parser("8000"), Ok(8000.0));
        assert_eq!(positive_rate_parser(" 1000.5 "), Ok(1000.5));
        assert!(positive_rate_parser("0").is_err());
        assert!(positive_rate_parser("-20").is_err());
        assert!(positive_rate_parser("nan").is_err());
        assert!(positive_rate_parser("ten").is_err());
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(25 * 3600), "25:00:00");
    }
}
