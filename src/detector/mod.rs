use std::fmt;

use thiserror::Error;

use crate::record::{Record, RecordId};
use crate::schema::Field;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    MobileNumber,
}

impl DuplicateField {
    pub fn field(self) -> Field {
        match self {
            Self::Email => Field::Email,
            Self::MobileNumber => Field::MobileNumber,
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("Email"),
            Self::MobileNumber => f.write_str("Mobile number"),
        }
    }
}

/// A candidate collided with an existing record. `value` is the candidate's
/// own value, after mobile normalization.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{field} \"{value}\" already exists")]
pub struct DuplicateConflict {
    pub field: DuplicateField,
    pub value: String,
    pub existing: RecordId,
}

/// Scan `records` in order and report the first one sharing the email
/// (case-insensitive) or the mobile number (exact). When both collide on the
/// same record the email wins.
pub fn find_duplicate<'a, I>(
    email: &str,
    mobile_number: &str,
    records: I,
    exclude: Option<RecordId>,
) -> Option<DuplicateConflict>
where
    I: IntoIterator<Item = &'a Record>,
{
    let email_lower = email.to_lowercase();
    for existing in records {
        if exclude == Some(existing.id) {
            continue;
        }
        if existing.fields.email.to_lowercase() == email_lower {
            return Some(DuplicateConflict {
                field: DuplicateField::Email,
                value: email.to_string(),
                existing: existing.id,
            });
        }
        if existing.fields.mobile_number == mobile_number {
            return Some(DuplicateConflict {
                field: DuplicateField::MobileNumber,
                value: mobile_number.to_string(),
                existing: existing.id,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFields;
    use chrono::{NaiveDate, Utc};

    fn record(email: &str, mobile: &str) -> Record {
        Record {
            id: RecordId::new(),
            fields: RecordFields {
                sl_no: 1,
                email: email.to_string(),
                mobile_number: mobile.to_string(),
                login_password: "123456".to_string(),
                email_password: None,
                assigned_person: "P".to_string(),
                ivac_center: "Dhaka".to_string(),
                total_bgd_file: 1,
                file_starting_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                file_success_date: None,
                note: None,
            },
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn email_match_ignores_case() {
        let records = vec![record("a@b.com", "01711111111")];
        let hit = find_duplicate("A@B.COM", "01800000000", &records, None).unwrap();
        assert_eq!(hit.field, DuplicateField::Email);
        assert_eq!(hit.existing, records[0].id);
        assert_eq!(hit.to_string(), "Email \"A@B.COM\" already exists");
    }

    #[test]
    fn mobile_match_is_literal() {
        let records = vec![record("a@b.com", "01711111111")];
        let hit = find_duplicate("c@d.com", "01711111111", &records, None).unwrap();
        assert_eq!(hit.field, DuplicateField::MobileNumber);
        assert_eq!(
            hit.to_string(),
            "Mobile number \"01711111111\" already exists"
        );
        assert!(find_duplicate("c@d.com", "01711111111_copy", &records, None).is_none());
    }

    #[test]
    fn email_reported_before_mobile_on_same_record() {
        let records = vec![record("a@b.com", "01711111111")];
        let hit = find_duplicate("a@b.com", "01711111111", &records, None).unwrap();
        assert_eq!(hit.field, DuplicateField::Email);
    }

    #[test]
    fn first_record_in_collection_order_wins() {
        let records = vec![
            record("x@y.com", "01711111111"),
            record("a@b.com", "01900000000"),
        ];
        let hit = find_duplicate("a@b.com", "01711111111", &records, None).unwrap();
        assert_eq!(hit.existing, records[0].id);
        assert_eq!(hit.field, DuplicateField::MobileNumber);
    }

    #[test]
    fn excluded_record_is_skipped() {
        let records = vec![record("a@b.com", "01711111111")];
        assert!(find_duplicate("a@b.com", "01711111111", &records, Some(records[0].id)).is_none());
    }
}
