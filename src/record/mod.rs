use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schema::Field;
use crate::utils;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| format!("invalid record id '{}': {e}", s.trim()))
    }
}

/// Unvalidated input as it arrives from a form, a CSV row or a pasted line.
/// Every value is kept as trimmed text until the validator turns it into
/// [`RecordFields`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
    pub sl_no: String,
    pub email: String,
    pub mobile_number: String,
    pub login_password: String,
    pub email_password: String,
    pub assigned_person: String,
    pub ivac_center: String,
    pub total_bgd_file: String,
    pub file_starting_date: String,
    pub file_success_date: String,
    pub note: String,
}

impl Candidate {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SlNo => &self.sl_no,
            Field::Email => &self.email,
            Field::MobileNumber => &self.mobile_number,
            Field::LoginPassword => &self.login_password,
            Field::EmailPassword => &self.email_password,
            Field::AssignedPerson => &self.assigned_person,
            Field::IvacCenter => &self.ivac_center,
            Field::TotalBgdFile => &self.total_bgd_file,
            Field::FileStartingDate => &self.file_starting_date,
            Field::FileSuccessDate => &self.file_success_date,
            Field::Note => &self.note,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into().trim().to_string();
        let slot = match field {
            Field::SlNo => &mut self.sl_no,
            Field::Email => &mut self.email,
            Field::MobileNumber => &mut self.mobile_number,
            Field::LoginPassword => &mut self.login_password,
            Field::EmailPassword => &mut self.email_password,
            Field::AssignedPerson => &mut self.assigned_person,
            Field::IvacCenter => &mut self.ivac_center,
            Field::TotalBgdFile => &mut self.total_bgd_file,
            Field::FileStartingDate => &mut self.file_starting_date,
            Field::FileSuccessDate => &mut self.file_success_date,
            Field::Note => &mut self.note,
        };
        *slot = value;
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_blank(&self) -> bool {
        crate::schema::ALL_FIELDS
            .iter()
            .all(|f| self.get(*f).trim().is_empty())
    }
}

impl From<&RecordFields> for Candidate {
    fn from(fields: &RecordFields) -> Self {
        Self {
            sl_no: fields.sl_no.to_string(),
            email: fields.email.clone(),
            mobile_number: fields.mobile_number.clone(),
            login_password: fields.login_password.clone(),
            email_password: fields.email_password.clone().unwrap_or_default(),
            assigned_person: fields.assigned_person.clone(),
            ivac_center: fields.ivac_center.clone(),
            total_bgd_file: fields.total_bgd_file.to_string(),
            file_starting_date: utils::format_iso_date(fields.file_starting_date),
            file_success_date: fields
                .file_success_date
                .map(utils::format_iso_date)
                .unwrap_or_default(),
            note: fields.note.clone().unwrap_or_default(),
        }
    }
}

/// Business fields of a record after parsing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub sl_no: u64,
    pub email: String,
    pub mobile_number: String,
    pub login_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_password: Option<String>,
    #[serde(default)]
    pub assigned_person: String,
    pub ivac_center: String,
    pub total_bgd_file: u64,
    pub file_starting_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_success_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RecordFields {
    pub fn status(&self) -> Status {
        if self.file_success_date.is_some() {
            Status::Done
        } else {
            Status::Processing
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn status(&self) -> Status {
        self.fields.status()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Done,
    Processing,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::Processing => "Processing",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fields() -> RecordFields {
        RecordFields {
            sl_no: 3,
            email: "a@gmail.com".to_string(),
            mobile_number: "01711111111".to_string(),
            login_password: "123456".to_string(),
            email_password: None,
            assigned_person: "P".to_string(),
            ivac_center: "Dhaka".to_string(),
            total_bgd_file: 2,
            file_starting_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            file_success_date: None,
            note: Some("first".to_string()),
        }
    }

    #[test]
    fn status_follows_success_date() {
        let mut fields = sample_fields();
        assert_eq!(fields.status(), Status::Processing);
        fields.file_success_date = NaiveDate::from_ymd_opt(2024, 1, 9);
        assert_eq!(fields.status(), Status::Done);
    }

    #[test]
    fn candidate_set_trims_values() {
        let c = Candidate::default().with(Field::Email, "  a@b.com \t");
        assert_eq!(c.get(Field::Email), "a@b.com");
        assert!(!c.is_blank());
        assert!(Candidate::default().with(Field::Note, "   ").is_blank());
    }

    #[test]
    fn candidate_from_fields_uses_iso_dates() {
        let c = Candidate::from(&sample_fields());
        assert_eq!(c.sl_no, "3");
        assert_eq!(c.file_starting_date, "2024-01-01");
        assert_eq!(c.file_success_date, "");
        assert_eq!(c.note, "first");
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = Record {
            id: RecordId::new(),
            fields: sample_fields(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["slNo"], 3);
        assert_eq!(json["mobileNumber"], "01711111111");
        assert_eq!(json["fileStartingDate"], "2024-01-01");
        assert!(json.get("updatedAt").is_none());

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_id_parses_from_display() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-an-id".parse::<RecordId>().is_err());
    }
}
