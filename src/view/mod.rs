mod filters;

use std::fmt;

pub use filters::ViewCriteria;

use crate::record::Record;

/// Records passing `criteria`, highest serial first. Records sharing a serial
/// keep their collection order.
pub fn filtered_view<'a, I>(records: I, criteria: &ViewCriteria) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut view: Vec<&Record> = records
        .into_iter()
        .filter(|r| criteria.matches(r))
        .collect();
    view.sort_by(|a, b| b.fields.sl_no.cmp(&a.fields.sl_no));
    view
}

/// Distinct centers in first-seen order, for populating a center filter.
pub fn centers<'a, I>(records: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut seen: Vec<&str> = Vec::new();
    for record in records {
        let center = record.fields.ivac_center.as_str();
        if !seen.contains(&center) {
            seen.push(center);
        }
    }
    seen
}

/// How many records a view shows out of the whole collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordCount {
    pub shown: usize,
    pub total: usize,
}

impl RecordCount {
    pub fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }

    pub fn is_filtered(&self) -> bool {
        self.shown != self.total
    }
}

// "12" when nothing is filtered out, "3 of 12" otherwise
impl fmt::Display for RecordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_filtered() {
            write!(f, "{} of {}", self.shown, self.total)
        } else {
            write!(f, "{}", self.total)
        }
    }
}
