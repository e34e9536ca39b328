use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::record::{Candidate, RecordFields};
use crate::schema::{Field, BULK_REQUIRED, INTERACTIVE_REQUIRED};
use crate::utils;

pub const MOBILE_DIGITS: usize = 11;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("{} is required!", .0.label())]
    Missing(Field),

    #[error("Missing required fields: {}", labels(.0))]
    MissingFields(Vec<Field>),

    #[error("Please enter a valid email address!")]
    InvalidEmail,

    #[error("Mobile number must be exactly 11 digits!")]
    MobileLength { digits: usize },

    #[error("Please enter a valid file starting date!")]
    InvalidStartDate,

    #[error("Please enter a valid file success date!")]
    InvalidSuccessDate,

    #[error("File success date must be after file starting date!")]
    SuccessBeforeStart,

    #[error("Serial number must be a positive number!")]
    InvalidSerial,

    #[error("Total BGD file must be a positive number!")]
    InvalidTotalFiles,
}

fn labels(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Violation {
    /// The field the violated rule is about. `MissingFields` reports the first.
    pub fn field(&self) -> Field {
        match self {
            Self::Missing(f) => *f,
            Self::MissingFields(fs) => fs.first().copied().unwrap_or(Field::SlNo),
            Self::InvalidEmail => Field::Email,
            Self::MobileLength { .. } => Field::MobileNumber,
            Self::InvalidStartDate => Field::FileStartingDate,
            Self::InvalidSuccessDate | Self::SuccessBeforeStart => Field::FileSuccessDate,
            Self::InvalidSerial => Field::SlNo,
            Self::InvalidTotalFiles => Field::TotalBgdFile,
        }
    }
}

/// Which rule set a candidate is admitted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Add/update: every rule, in order.
    Interactive,
    /// CSV import and bulk paste: presence of the bulk-required fields plus
    /// whatever parsing the typed record needs. The mobile is reduced to its
    /// digits like on the interactive path, but email shape, mobile length and
    /// date ordering are not checked.
    Bulk,
}

pub fn is_valid_email(value: &str) -> bool {
    email_re().is_match(value)
}

pub fn is_valid_mobile(value: &str) -> bool {
    utils::digits_only(value).len() == MOBILE_DIGITS
}

/// Run the interactive rules, stopping at the first failure.
pub fn validate(candidate: &Candidate) -> Result<(), Violation> {
    build(candidate).map(|_| ())
}

pub fn build_with(candidate: &Candidate, mode: Mode) -> Result<RecordFields, Violation> {
    match mode {
        Mode::Interactive => build(candidate),
        Mode::Bulk => build_lenient(candidate),
    }
}

/// Interactive smart constructor.
pub fn build(candidate: &Candidate) -> Result<RecordFields, Violation> {
    for field in INTERACTIVE_REQUIRED {
        if candidate.get(field).is_empty() {
            return Err(Violation::Missing(field));
        }
    }

    if !is_valid_email(&candidate.email) {
        return Err(Violation::InvalidEmail);
    }

    let mobile = utils::digits_only(&candidate.mobile_number);
    if mobile.len() != MOBILE_DIGITS {
        return Err(Violation::MobileLength {
            digits: mobile.len(),
        });
    }

    let start = utils::parse_iso_date(&candidate.file_starting_date)
        .ok_or(Violation::InvalidStartDate)?;

    let success = parse_success_date(&candidate.file_success_date)?;
    if let Some(success) = success {
        if success < start {
            return Err(Violation::SuccessBeforeStart);
        }
    }

    let sl_no = utils::parse_positive_int(&candidate.sl_no).ok_or(Violation::InvalidSerial)?;
    let total =
        utils::parse_positive_int(&candidate.total_bgd_file).ok_or(Violation::InvalidTotalFiles)?;

    Ok(RecordFields {
        sl_no,
        email: candidate.email.clone(),
        mobile_number: mobile,
        login_password: candidate.login_password.clone(),
        email_password: optional(&candidate.email_password),
        assigned_person: candidate.assigned_person.clone(),
        ivac_center: candidate.ivac_center.clone(),
        total_bgd_file: total,
        file_starting_date: start,
        file_success_date: success,
        note: optional(&candidate.note),
    })
}

pub fn missing_bulk_fields(candidate: &Candidate) -> Vec<Field> {
    BULK_REQUIRED
        .iter()
        .copied()
        .filter(|f| candidate.get(*f).is_empty())
        .collect()
}

/// Bulk smart constructor.
pub fn build_lenient(candidate: &Candidate) -> Result<RecordFields, Violation> {
    let missing = missing_bulk_fields(candidate);
    if !missing.is_empty() {
        return Err(Violation::MissingFields(missing));
    }

    let start = utils::parse_iso_date(&candidate.file_starting_date)
        .ok_or(Violation::InvalidStartDate)?;
    let success = parse_success_date(&candidate.file_success_date)?;
    let sl_no = utils::parse_positive_int(&candidate.sl_no).ok_or(Violation::InvalidSerial)?;
    let total =
        utils::parse_positive_int(&candidate.total_bgd_file).ok_or(Violation::InvalidTotalFiles)?;

    Ok(RecordFields {
        sl_no,
        email: candidate.email.clone(),
        mobile_number: utils::digits_only(&candidate.mobile_number),
        login_password: candidate.login_password.clone(),
        email_password: optional(&candidate.email_password),
        assigned_person: candidate.assigned_person.clone(),
        ivac_center: candidate.ivac_center.clone(),
        total_bgd_file: total,
        file_starting_date: start,
        file_success_date: success,
        note: optional(&candidate.note),
    })
}

fn parse_success_date(raw: &str) -> Result<Option<chrono::NaiveDate>, Violation> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    utils::parse_iso_date(raw)
        .map(Some)
        .ok_or(Violation::InvalidSuccessDate)
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Candidate {
        Candidate::default()
            .with(Field::SlNo, "1")
            .with(Field::Email, "a@gmail.com")
            .with(Field::MobileNumber, "01711111111")
            .with(Field::LoginPassword, "123456")
            .with(Field::AssignedPerson, "P")
            .with(Field::IvacCenter, "Dhaka")
            .with(Field::TotalBgdFile, "2")
            .with(Field::FileStartingDate, "2024-01-01")
    }

    #[test]
    fn accepts_minimal_valid_candidate() {
        let fields = build(&valid()).unwrap();
        assert_eq!(fields.sl_no, 1);
        assert_eq!(fields.total_bgd_file, 2);
        assert_eq!(fields.email_password, None);
        assert_eq!(fields.note, None);
    }

    #[test]
    fn presence_is_checked_in_schema_order() {
        let c = valid()
            .with(Field::Email, "")
            .with(Field::IvacCenter, "");
        assert_eq!(validate(&c), Err(Violation::Missing(Field::Email)));
        assert_eq!(
            Violation::Missing(Field::AssignedPerson).to_string(),
            "Assigned person for this BGD file is required!"
        );
    }

    #[test]
    fn presence_wins_over_format_errors() {
        let c = valid()
            .with(Field::Email, "not-an-email")
            .with(Field::TotalBgdFile, "");
        assert_eq!(validate(&c), Err(Violation::Missing(Field::TotalBgdFile)));
    }

    #[test]
    fn email_shape() {
        for bad in ["a@b", "a b@c.com", "@b.com", "a@.com", "a@b."] {
            let c = valid().with(Field::Email, bad);
            assert_eq!(validate(&c), Err(Violation::InvalidEmail), "{bad}");
        }
        assert!(validate(&valid().with(Field::Email, "x.y+z@mail.co.uk")).is_ok());
    }

    #[test]
    fn mobile_rule_counts_digits_only() {
        for ok in ["01711111111", "017-1111-1111", "(017) 1111 1111"] {
            let fields = build(&valid().with(Field::MobileNumber, ok)).unwrap();
            assert_eq!(fields.mobile_number, "01711111111");
        }
        for bad in ["0171111111", "+8801711111111", "abc"] {
            let err = validate(&valid().with(Field::MobileNumber, bad)).unwrap_err();
            assert_eq!(err.field(), Field::MobileNumber, "{bad}");
        }
    }

    #[test]
    fn mobile_checked_before_dates() {
        let c = valid()
            .with(Field::MobileNumber, "123")
            .with(Field::FileStartingDate, "garbage");
        assert_eq!(validate(&c), Err(Violation::MobileLength { digits: 3 }));
    }

    #[test]
    fn success_date_rules() {
        let bad = valid().with(Field::FileSuccessDate, "2024-13-01");
        assert_eq!(validate(&bad), Err(Violation::InvalidSuccessDate));

        let early = valid().with(Field::FileSuccessDate, "2023-12-31");
        assert_eq!(validate(&early), Err(Violation::SuccessBeforeStart));

        let same_day = valid().with(Field::FileSuccessDate, "2024-01-01");
        assert!(validate(&same_day).is_ok());
    }

    #[test]
    fn serial_then_total() {
        let c = valid()
            .with(Field::SlNo, "0")
            .with(Field::TotalBgdFile, "-1");
        assert_eq!(validate(&c), Err(Violation::InvalidSerial));

        let c = valid().with(Field::TotalBgdFile, "none");
        assert_eq!(validate(&c), Err(Violation::InvalidTotalFiles));
    }

    #[test]
    fn lenient_build_skips_format_rules() {
        let c = valid()
            .with(Field::AssignedPerson, "")
            .with(Field::Email, "not-an-email")
            .with(Field::MobileNumber, "+8801234567890")
            .with(Field::FileSuccessDate, "2023-01-01");
        let fields = build_lenient(&c).unwrap();
        assert_eq!(fields.email, "not-an-email");
        assert_eq!(fields.mobile_number, "8801234567890");
        assert_eq!(fields.assigned_person, "");
    }

    #[test]
    fn lenient_build_reports_all_missing_fields() {
        let c = valid()
            .with(Field::IvacCenter, "")
            .with(Field::SlNo, "");
        let err = build_lenient(&c).unwrap_err();
        assert_eq!(
            err,
            Violation::MissingFields(vec![Field::SlNo, Field::IvacCenter])
        );
        assert_eq!(
            err.to_string(),
            "Missing required fields: Serial Number, IVAC Center"
        );
    }

    #[test]
    fn lenient_build_still_needs_representable_values() {
        let c = valid().with(Field::SlNo, "abc");
        assert_eq!(
            build_with(&c, Mode::Bulk),
            Err(Violation::InvalidSerial)
        );
    }
}
