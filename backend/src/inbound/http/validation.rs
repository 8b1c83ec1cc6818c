//! Request payload validation helpers shared by the HTTP handlers.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::donor::date_string;
use crate::domain::{BloodGroup, Error};

/// Error for a required field the client left out or empty.
pub fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}"))
        .with_details(json!({ "field": field, "code": "missing_field" }))
}

/// Parse a `YYYY-MM-DD` date field strictly.
///
/// Unlike the lenient store decoding, a user-supplied date that does not
/// parse is an error the submitter must see, not data to be normalised.
pub fn parse_date_field(field: &str, value: &str) -> Result<NaiveDate, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing_field_error(field));
    }
    NaiveDate::parse_from_str(trimmed, date_string::FORMAT).map_err(|_| {
        Error::invalid_request(format!("{field} must be a YYYY-MM-DD date")).with_details(json!({
            "field": field,
            "value": trimmed,
            "code": "invalid_date",
        }))
    })
}

/// Parse a blood group field.
pub fn parse_blood_group_field(field: &str, value: &str) -> Result<BloodGroup, Error> {
    value.parse::<BloodGroup>().map_err(|_| {
        Error::invalid_request(format!("{field} must be one of the eight blood groups"))
            .with_details(json!({
                "field": field,
                "value": value,
                "code": "invalid_blood_group",
            }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[test]
    fn parses_iso_dates() {
        let date = parse_date_field("lastDonationDate", "2024-01-15").expect("valid date");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"));
    }

    #[rstest]
    #[case("")]
    #[case("15/01/2024")]
    #[case("2024-13-40")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        let err = parse_date_field("lastDonationDate", raw).expect_err("invalid date");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[test]
    fn rejects_unknown_blood_groups() {
        let err = parse_blood_group_field("bloodGroup", "C+").expect_err("invalid group");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err
            .details()
            .and_then(|value| value.as_object())
            .expect("details");
        assert_eq!(
            details.get("field").and_then(|v| v.as_str()),
            Some("bloodGroup")
        );
    }
}
