use chrono::NaiveDate;

use crate::ServiceError;

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| ServiceError::Validation(format!("invalid date '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_rfc3339() {
        let ts = now_rfc3339();
        assert!(ts.contains('T'));
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2026-10-20").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert_eq!(parse_date(" 2026-01-05 ").unwrap().to_string(), "2026-01-05");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("20/10/2026").unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert!(parse_date("2026-02-30").is_err());
    }
}
