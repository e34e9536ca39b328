pub mod parse;

use thiserror::Error;
use tracing::{debug, info};

use crate::detector::DuplicateConflict;
use crate::record::{Candidate, RecordId};
use crate::schema::{Field, PASTE_ORDER};
use crate::store::{RecordStore, Storage, StoreError};
use crate::utils;
use crate::validator::{Mode, Violation};

/// Spreadsheet header spellings accepted for each field, lower-cased.
pub const HEADER_SYNONYMS: &[(&str, Field)] = &[
    ("sl no", Field::SlNo),
    ("serial no", Field::SlNo),
    ("serial number", Field::SlNo),
    ("email", Field::Email),
    ("email address", Field::Email),
    ("mobile", Field::MobileNumber),
    ("mobile number", Field::MobileNumber),
    ("phone", Field::MobileNumber),
    ("phone number", Field::MobileNumber),
    ("login password", Field::LoginPassword),
    ("password", Field::LoginPassword),
    ("email password", Field::EmailPassword),
    ("assigned person", Field::AssignedPerson),
    ("assigned person for this bgd file", Field::AssignedPerson),
    ("ivac center", Field::IvacCenter),
    ("center", Field::IvacCenter),
    ("total bgd file", Field::TotalBgdFile),
    ("bgd file", Field::TotalBgdFile),
    ("file starting date", Field::FileStartingDate),
    ("starting date", Field::FileStartingDate),
    ("start date", Field::FileStartingDate),
    ("file success date", Field::FileSuccessDate),
    ("success date", Field::FileSuccessDate),
    ("end date", Field::FileSuccessDate),
    ("note", Field::Note),
    ("notes", Field::Note),
];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV file must contain headers and at least one data row!")]
    NoData,

    #[error("Please paste some data first!")]
    EmptyPaste,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RowFailure {
    #[error(transparent)]
    Invalid(#[from] Violation),

    #[error(transparent)]
    Duplicate(#[from] DuplicateConflict),
}

/// A skipped row. `row` counts data rows from 1, header excluded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Row {row}: {reason}")]
pub struct ImportRowError {
    pub row: usize,
    pub reason: RowFailure,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<RecordId>,
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    pub fn summary(&self) -> String {
        let mut message = format!(
            "Import completed: {} records imported",
            self.imported_count()
        );
        if self.skipped > 0 {
            message.push_str(&format!(", {} records skipped", self.skipped));
        }
        message
    }
}

pub fn map_header(header: &str) -> Option<Field> {
    let lowered = header.trim().to_lowercase();
    HEADER_SYNONYMS
        .iter()
        .find(|(name, _)| *name == lowered)
        .map(|(_, field)| *field)
        .or_else(|| Field::from_key(&lowered))
}

pub fn map_headers<T: AsRef<str>>(headers: &[T]) -> Vec<Option<Field>> {
    headers.iter().map(|h| map_header(h.as_ref())).collect()
}

/// Build a candidate from one row. Cells under unmapped columns are dropped;
/// missing trailing cells leave their fields blank. A mobile exported as
/// `="0171..."` is unwrapped back to its digits.
pub fn row_to_candidate<T: AsRef<str>>(columns: &[Option<Field>], cells: &[T]) -> Candidate {
    let mut candidate = Candidate::default();
    for (column, cell) in columns.iter().zip(cells) {
        match column {
            Some(Field::MobileNumber) => {
                candidate.set(Field::MobileNumber, utils::unwrap_spreadsheet_text(cell.as_ref()))
            }
            Some(field) => candidate.set(*field, cell.as_ref()),
            None => {}
        }
    }
    candidate
}

/// Admit each row through the store under the bulk rules. Rows that fail are
/// recorded and skipped; admitted rows are persisted in one save at the end.
pub fn import_rows<S, T>(
    store: &mut RecordStore<S>,
    columns: &[Option<Field>],
    rows: &[Vec<T>],
) -> Result<ImportReport, ImportError>
where
    S: Storage,
    T: AsRef<str>,
{
    let mut report = ImportReport::default();
    let mut batch = store.batch();

    for (idx, cells) in rows.iter().enumerate() {
        let row = idx + 1;
        let candidate = row_to_candidate(columns, cells);
        if candidate.is_blank() {
            debug!(row, "skipping blank row");
            report.skipped += 1;
            continue;
        }

        let reason = match batch.admit(&candidate, Mode::Bulk) {
            Ok(record) => {
                debug!(row, id = %record.id, "row imported");
                report.imported.push(record.id);
                continue;
            }
            Err(StoreError::Validation(v)) => RowFailure::Invalid(v),
            Err(StoreError::Duplicate(d)) => RowFailure::Duplicate(d),
            Err(other) => return Err(other.into()),
        };
        debug!(row, %reason, "row skipped");
        report.skipped += 1;
        report.errors.push(ImportRowError { row, reason });
    }

    batch.commit()?;
    info!(
        imported = report.imported_count(),
        skipped = report.skipped,
        "import finished"
    );
    Ok(report)
}

/// Import CSV file contents: a header row followed by data rows.
pub fn import_csv<S: Storage>(
    store: &mut RecordStore<S>,
    text: &str,
) -> Result<ImportReport, ImportError> {
    let records = parse::split_records(parse::strip_bom(text));
    if records.len() < 2 {
        return Err(ImportError::NoData);
    }
    let headers = parse::parse_csv_row(&records[0]);
    let columns = map_headers(&headers);
    debug!(?columns, "mapped CSV headers");
    let rows: Vec<Vec<String>> = records[1..]
        .iter()
        .map(|r| parse::parse_csv_row(r))
        .collect();
    import_rows(store, &columns, &rows)
}

/// Import pasted spreadsheet rows. There is no header row; cells follow
/// [`PASTE_ORDER`].
pub fn import_paste<S: Storage>(
    store: &mut RecordStore<S>,
    text: &str,
) -> Result<ImportReport, ImportError> {
    let text = parse::strip_bom(text).trim();
    if text.is_empty() {
        return Err(ImportError::EmptyPaste);
    }
    let rows: Vec<Vec<String>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse::split_paste_line)
        .collect();
    let columns: Vec<Option<Field>> = PASTE_ORDER.iter().copied().map(Some).collect();
    import_rows(store, &columns, &rows)
}
