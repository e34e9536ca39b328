use chrono::NaiveDate;

use crate::record::Record;

/// Display filters. Inactive criteria (`None`, or a blank search term) let
/// every record through; active ones are AND-ed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewCriteria {
    pub search: Option<String>,
    pub center: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ViewCriteria {
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none()
            && self.center_filter().is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    pub fn matches(&self, record: &Record) -> bool {
        let fields = &record.fields;
        if let Some(term) = self.search_term() {
            let hit = [
                &fields.email,
                &fields.mobile_number,
                &fields.ivac_center,
                &fields.login_password,
            ]
            .iter()
            .any(|value| value.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if let Some(center) = self.center_filter() {
            if fields.ivac_center != center {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if fields.file_starting_date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if fields.file_starting_date > to {
                return false;
            }
        }
        true
    }

    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    }

    fn center_filter(&self) -> Option<&str> {
        self.center.as_deref().filter(|s| !s.is_empty())
    }
}
