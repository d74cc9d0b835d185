//! The diagnostic test entity.

use chrono::{DateTime, NaiveDate, Utc};
use dtr_types::Label;
use dtr_uuid::{format_timestamp, RecordId};
use serde::{Serialize, Serializer};

/// The validated, client-editable fields of a diagnostic test.
///
/// Only [`crate::validation::parse_test_fields`] produces values of this type from untrusted
/// input, so holding one means the length and date rules have already been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFields {
    pub patient_name: Label,
    pub test_type: Label,
    pub result: String,
    pub test_date: NaiveDate,
    pub notes: Option<String>,
}

/// A stored diagnostic test record.
///
/// Serialises to the public JSON shape:
/// `{id, patientName, testType, result, testDate, notes, createdAt, updatedAt}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticTest {
    pub id: RecordId,
    pub patient_name: String,
    pub test_type: String,
    pub result: String,
    pub test_date: NaiveDate,
    pub notes: Option<String>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn serializes_with_camel_case_keys() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let record = DiagnosticTest {
            id: RecordId::parse("550e8400e29b41d4a716446655440000").unwrap(),
            patient_name: "Jane Doe".into(),
            test_type: "Blood Panel".into(),
            result: "Normal".into(),
            test_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            notes: None,
            created_at: ts,
            updated_at: ts,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "550e8400e29b41d4a716446655440000");
        assert_eq!(json["patientName"], "Jane Doe");
        assert_eq!(json["testType"], "Blood Panel");
        assert_eq!(json["testDate"], "2024-01-15");
        assert!(json["notes"].is_null());
        assert_eq!(json["createdAt"], "2024-01-15T09:00:00.000000Z");
        assert!(json.get("updatedAt").is_some());
    }
}
