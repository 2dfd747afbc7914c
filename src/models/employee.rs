use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::face::FaceRepresentation;

const MISSING_TEXT: &str = "N/A";

/// Stored employee document. Every field is optional on read because
/// documents written by older clients may lack some of them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FaceEntry {
    #[serde(rename = "EmployeeCode", default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "Department", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "time", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// One entry per submitted image, each holding every face found in it.
    #[serde(default)]
    pub embeddings: Vec<Vec<FaceRepresentation>>,
    #[serde(rename = "Images", default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// A document together with its internal store identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFaceEntry {
    pub id: Uuid,
    pub entry: FaceEntry,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone)]
pub struct NewEmployee {
    #[serde(rename = "EmployeeCode")]
    pub employee_code: i64,
    #[serde(rename = "Name")]
    #[validate(length(min = 1))]
    pub name: String,
    pub gender: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Images")]
    #[validate(length(min = 1))]
    pub images: Vec<String>,
}

/// Replacement fields for an existing employee. Embeddings are left as they are.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq)]
pub struct EmployeeUpdate {
    #[serde(rename = "Name")]
    #[validate(length(min = 1))]
    pub name: String,
    pub gender: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

/// Public list shape.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    #[serde(rename = "EmployeeCode")]
    pub employee_code: i64,
    #[serde(rename = "Name")]
    pub name: String,
    pub gender: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Images")]
    pub images: Vec<String>,
}

/// Single-record projection returned by the read endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EmployeeDetails {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "Department", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(rename = "Images", skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl From<FaceEntry> for Employee {
    fn from(entry: FaceEntry) -> Self {
        let or_missing = |value: Option<String>| value.unwrap_or_else(|| MISSING_TEXT.to_string());
        Employee {
            employee_code: entry.employee_code.unwrap_or(0),
            name: or_missing(entry.name),
            gender: or_missing(entry.gender),
            department: or_missing(entry.department),
            images: entry.images.unwrap_or_default(),
        }
    }
}

impl From<FaceEntry> for EmployeeDetails {
    fn from(entry: FaceEntry) -> Self {
        EmployeeDetails {
            name: entry.name,
            gender: entry.gender,
            department: entry.department,
            images: entry.images,
        }
    }
}

impl FaceEntry {
    /// Applies an update in place, returning whether any field changed.
    pub fn apply(&mut self, update: &EmployeeUpdate) -> bool {
        let before = self.clone();
        self.name = Some(update.name.clone());
        self.gender = Some(update.gender.clone());
        self.department = Some(update.department.clone());
        self.images = Some(update.images.clone());
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_projection_fills_missing_fields() {
        let entry: FaceEntry = serde_json::from_value(json!({ "Name": "Asha" })).unwrap();
        let employee = Employee::from(entry);

        assert_eq!(employee.employee_code, 0);
        assert_eq!(employee.name, "Asha");
        assert_eq!(employee.gender, "N/A");
        assert_eq!(employee.department, "N/A");
        assert!(employee.images.is_empty());
    }

    #[test]
    fn details_omit_absent_fields() {
        let entry: FaceEntry = serde_json::from_value(json!({
            "EmployeeCode": 7,
            "Name": "Ravi",
            "Images": ["aGk="],
        }))
        .unwrap();

        let body = serde_json::to_value(EmployeeDetails::from(entry)).unwrap();
        assert_eq!(body, json!({ "Name": "Ravi", "Images": ["aGk="] }));
    }

    #[test]
    fn new_employee_requires_an_image() {
        let payload: NewEmployee = serde_json::from_value(json!({
            "EmployeeCode": 1,
            "Name": "Mei",
            "gender": "female",
            "Department": "Ops",
            "Images": [],
        }))
        .unwrap();

        assert!(payload.validate().is_err());
    }

    #[test]
    fn apply_reports_unchanged_values() {
        let mut entry = FaceEntry {
            employee_code: Some(3),
            name: Some("Lin".into()),
            gender: Some("male".into()),
            department: Some("R&D".into()),
            images: Some(vec!["a".into()]),
            ..Default::default()
        };
        let same = EmployeeUpdate {
            name: "Lin".into(),
            gender: "male".into(),
            department: "R&D".into(),
            images: vec!["a".into()],
        };
        assert!(!entry.apply(&same));

        let moved = EmployeeUpdate { department: "Sales".into(), ..same };
        assert!(entry.apply(&moved));
        assert_eq!(entry.department.as_deref(), Some("Sales"));
    }
}
