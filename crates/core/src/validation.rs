//! Input validation for diagnostic test records.
//!
//! [`parse_test_fields`] is the schema: it takes an arbitrary JSON value (a request body, or a
//! value assembled by the CLI) and either returns normalised [`TestFields`] or a
//! [`ValidationErrors`] listing every field that broke a rule, in field order.
//!
//! Rules:
//! - `patientName`, `testType`: required strings of at least [`MIN_LABEL_LEN`] characters
//! - `result`: required string, any length
//! - `testDate`: required string that parses as a date (`YYYY-MM-DD` or RFC 3339)
//! - `notes`: optional string; `null` is treated as absent

use crate::record::TestFields;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dtr_types::{Label, TextError, MIN_LABEL_LEN};
use serde::Serialize;
use serde_json::{Map, Value};

/// One broken rule on one input field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// JSON key of the offending field (`body` when the input is not an object).
    pub field: &'static str,
    /// Human readable reason, suitable for showing to the user as is.
    #[serde(rename = "message")]
    pub reason: String,
}

/// All rules broken by one input, never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    fn single(field: &'static str, reason: impl Into<String>) -> Self {
        Self(vec![ValidationError {
            field,
            reason: reason.into(),
        }])
    }

    pub fn issues(&self) -> &[ValidationError] {
        &self.0
    }

    /// True if `field` has at least one issue.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for issue in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(&issue.reason)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Field keys and the names used for them in messages.
const PATIENT_NAME: (&str, &str) = ("patientName", "Patient name");
const TEST_TYPE: (&str, &str) = ("testType", "Test type");
const RESULT: (&str, &str) = ("result", "Result");
const TEST_DATE: (&str, &str) = ("testDate", "Test date");
const NOTES: (&str, &str) = ("notes", "Notes");

/// Validate and normalise an input object into [`TestFields`].
///
/// # Errors
///
/// Returns every broken rule at once rather than stopping at the first.
pub fn parse_test_fields(input: &Value) -> Result<TestFields, ValidationErrors> {
    let Some(obj) = input.as_object() else {
        return Err(ValidationErrors::single(
            "body",
            "Request body must be a JSON object.",
        ));
    };

    let mut issues = Vec::new();

    let patient_name = label_field(obj, PATIENT_NAME, &mut issues);
    let test_type = label_field(obj, TEST_TYPE, &mut issues);
    let result = string_field(obj, RESULT, &mut issues);
    let test_date = string_field(obj, TEST_DATE, &mut issues).and_then(|raw| {
        let parsed = parse_test_date(&raw);
        if parsed.is_none() {
            issues.push(ValidationError {
                field: TEST_DATE.0,
                reason: "Invalid date format.".into(),
            });
        }
        parsed
    });
    let notes = optional_string_field(obj, NOTES, &mut issues);

    match (patient_name, test_type, result, test_date, notes) {
        (Some(patient_name), Some(test_type), Some(result), Some(test_date), Ok(notes))
            if issues.is_empty() =>
        {
            Ok(TestFields {
                patient_name,
                test_type,
                result,
                test_date,
                notes,
            })
        }
        _ => Err(ValidationErrors(issues)),
    }
}

/// Parse a test date the way the form and API accept it.
///
/// `YYYY-MM-DD` is taken as is. Date-times keep the calendar date of their UTC instant;
/// date-times without an offset keep their own date.
pub fn parse_test_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn string_field(
    obj: &Map<String, Value>,
    (key, name): (&'static str, &str),
    issues: &mut Vec<ValidationError>,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            issues.push(ValidationError {
                field: key,
                reason: format!("{name} is required."),
            });
            None
        }
        Some(_) => {
            issues.push(ValidationError {
                field: key,
                reason: format!("{name} must be a string."),
            });
            None
        }
    }
}

fn label_field(
    obj: &Map<String, Value>,
    (key, name): (&'static str, &str),
    issues: &mut Vec<ValidationError>,
) -> Option<Label> {
    let raw = string_field(obj, (key, name), issues)?;
    match Label::new(raw) {
        Ok(label) => Some(label),
        Err(TextError::TooShort { .. }) => {
            issues.push(ValidationError {
                field: key,
                reason: format!("{name} must be at least {MIN_LABEL_LEN} characters."),
            });
            None
        }
    }
}

fn optional_string_field(
    obj: &Map<String, Value>,
    (key, name): (&'static str, &str),
    issues: &mut Vec<ValidationError>,
) -> Result<Option<String>, ()> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => {
            issues.push(ValidationError {
                field: key,
                reason: format!("{name} must be a string."),
            });
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_input() -> Value {
        json!({
            "patientName": "Jane Doe",
            "testType": "Blood Panel",
            "result": "Normal",
            "testDate": "2024-01-15",
            "notes": null
        })
    }

    #[test]
    fn accepts_valid_input() {
        let fields = parse_test_fields(&valid_input()).unwrap();
        assert_eq!(fields.patient_name.as_str(), "Jane Doe");
        assert_eq!(fields.test_type.as_str(), "Blood Panel");
        assert_eq!(fields.result, "Normal");
        assert_eq!(
            fields.test_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(fields.notes, None);
    }

    #[test]
    fn notes_are_passed_through_unchanged() {
        let mut input = valid_input();
        input["notes"] = json!("  fasting sample ");
        let fields = parse_test_fields(&input).unwrap();
        assert_eq!(fields.notes.as_deref(), Some("  fasting sample "));
    }

    #[test]
    fn missing_notes_is_absent() {
        let mut input = valid_input();
        input.as_object_mut().unwrap().remove("notes");
        assert_eq!(parse_test_fields(&input).unwrap().notes, None);
    }

    #[test]
    fn empty_result_is_allowed() {
        let mut input = valid_input();
        input["result"] = json!("");
        assert_eq!(parse_test_fields(&input).unwrap().result, "");
    }

    #[test]
    fn short_patient_name_is_rejected() {
        let mut input = valid_input();
        input["patientName"] = json!("J");
        let errors = parse_test_fields(&input).unwrap_err();
        assert_eq!(errors.issues().len(), 1);
        assert_eq!(errors.issues()[0].field, "patientName");
        assert_eq!(
            errors.issues()[0].reason,
            "Patient name must be at least 2 characters."
        );
    }

    #[test]
    fn short_test_type_is_rejected() {
        let mut input = valid_input();
        input["testType"] = json!("X");
        let errors = parse_test_fields(&input).unwrap_err();
        assert!(errors.has_field("testType"));
        assert!(errors.to_string().contains("Test type must be at least 2"));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let mut input = valid_input();
        input["testDate"] = json!("not-a-date");
        let errors = parse_test_fields(&input).unwrap_err();
        assert_eq!(errors.issues()[0].reason, "Invalid date format.");
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        let mut input = valid_input();
        input["testDate"] = json!("2024-02-30");
        assert!(parse_test_fields(&input).unwrap_err().has_field("testDate"));
    }

    #[test]
    fn reports_every_broken_field_in_order() {
        let input = json!({
            "patientName": "J",
            "testType": 7,
            "testDate": "soon"
        });
        let errors = parse_test_fields(&input).unwrap_err();
        let fields: Vec<_> = errors.issues().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["patientName", "testType", "result", "testDate"]);
        assert_eq!(errors.issues()[1].reason, "Test type must be a string.");
        assert_eq!(errors.issues()[2].reason, "Result is required.");
    }

    #[test]
    fn non_string_notes_are_rejected() {
        let mut input = valid_input();
        input["notes"] = json!(42);
        assert!(parse_test_fields(&input).unwrap_err().has_field("notes"));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let errors = parse_test_fields(&json!(["Jane Doe"])).unwrap_err();
        assert_eq!(errors.issues()[0].field, "body");
    }

    #[test]
    fn date_parsing_accepts_iso_date_times() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_test_date("2024-01-15"), Some(expected));
        assert_eq!(parse_test_date("2024-01-15T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_test_date("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_test_date("2024-01-16T01:00:00+02:00"), Some(expected));
        assert_eq!(parse_test_date("15/01/2024"), None);
    }

    #[test]
    fn errors_serialize_as_field_message_pairs() {
        let errors = ValidationErrors::single("testDate", "Invalid date format.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!([{ "field": "testDate", "message": "Invalid date format." }])
        );
    }
}
