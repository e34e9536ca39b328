pub mod persistence;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::detector::{self, DuplicateConflict};
use crate::record::{Candidate, Record, RecordFields, RecordId};
use crate::utils;
use crate::validator::{self, Mode, Violation};

pub use persistence::{JsonFileStorage, MemoryStorage, Snapshot, Storage, StorageError};

const COPY_MARKER: &str = "_copy";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] Violation),

    #[error("Duplicate found: {0}")]
    Duplicate(#[from] DuplicateConflict),

    #[error("Record {id} not found")]
    NotFound { id: RecordId },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Owns the record collection and the serial counter. Every mutation builds
/// the next state on a copy, saves it, and only then makes it visible, so a
/// rejected or unsaved operation leaves the store untouched.
#[derive(Debug)]
pub struct RecordStore<S: Storage> {
    storage: S,
    state: Snapshot,
}

impl<S: Storage> RecordStore<S> {
    /// Load from `storage`. Unreadable or corrupt data is treated as absent.
    pub fn open(storage: S) -> Self {
        let mut state = match storage.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => Snapshot::default(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable record data");
                Snapshot::default()
            }
        };
        if state.current_record_id == 0 {
            state.current_record_id = 1;
        }
        debug!(
            records = state.records.len(),
            next_serial = state.current_record_id,
            "record store opened"
        );
        Self { storage, state }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn records(&self) -> &[Record] {
        &self.state.records
    }

    pub fn len(&self) -> usize {
        self.state.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.state.records.iter().find(|r| r.id == id)
    }

    /// Serial number to pre-fill for the next record.
    pub fn next_serial(&self) -> u64 {
        self.state.current_record_id
    }

    pub fn create(&mut self, candidate: &Candidate) -> Result<Record, StoreError> {
        let mut next = self.state.clone();
        let record = admit(&mut next, candidate, Mode::Interactive, Utc::now())?;
        self.commit(next)?;
        info!(id = %record.id, sl_no = record.fields.sl_no, "record created");
        Ok(record)
    }

    pub fn update(&mut self, id: RecordId, candidate: &Candidate) -> Result<Record, StoreError> {
        let idx = self.index_of(id)?;
        let fields = validator::build(candidate)?;
        check_duplicate(&self.state.records, &fields.email, &fields.mobile_number, Some(id))?;

        let mut next = self.state.clone();
        let slot = &mut next.records[idx];
        slot.fields = fields;
        slot.updated_at = Some(Utc::now());
        let record = slot.clone();
        self.commit(next)?;
        info!(id = %id, "record updated");
        Ok(record)
    }

    pub fn delete(&mut self, id: RecordId) -> Result<Record, StoreError> {
        let idx = self.index_of(id)?;
        let mut next = self.state.clone();
        let removed = next.records.remove(idx);
        self.commit(next)?;
        info!(id = %id, "record deleted");
        Ok(removed)
    }

    /// Copy a record under a fresh serial. The copy's email and mobile number
    /// carry a `_copy` marker so it does not collide with the original; the
    /// user is expected to correct both afterwards. No duplicate check runs.
    pub fn duplicate(&mut self, id: RecordId) -> Result<Record, StoreError> {
        let idx = self.index_of(id)?;
        let mut next = self.state.clone();

        let mut fields = next.records[idx].fields.clone();
        fields.sl_no = next.current_record_id;
        next.current_record_id = next.current_record_id.saturating_add(1);
        fields.email = mark_email_copy(&fields.email);
        fields.mobile_number.push_str(COPY_MARKER);

        let record = Record {
            id: RecordId::new(),
            fields,
            created_at: Utc::now(),
            updated_at: None,
        };
        next.records.push(record.clone());
        self.commit(next)?;
        info!(source = %id, id = %record.id, sl_no = record.fields.sl_no, "record duplicated");
        Ok(record)
    }

    /// Remove every record and reset the serial counter. Returns how many
    /// records were removed.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        let removed = self.state.records.len();
        self.commit(Snapshot::default())?;
        info!(removed, "all records cleared");
        Ok(removed)
    }

    /// Start a batch of admissions that is persisted once on commit.
    pub fn batch(&mut self) -> Batch<'_, S> {
        let working = self.state.clone();
        Batch {
            store: self,
            working,
            admitted: 0,
        }
    }

    fn index_of(&self, id: RecordId) -> Result<usize, StoreError> {
        self.state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })
    }

    fn commit(&mut self, next: Snapshot) -> Result<(), StoreError> {
        self.storage.save(&next)?;
        self.state = next;
        Ok(())
    }
}

pub struct Batch<'a, S: Storage> {
    store: &'a mut RecordStore<S>,
    working: Snapshot,
    admitted: usize,
}

impl<S: Storage> Batch<'_, S> {
    /// Admit one candidate into the working copy. Duplicates are checked
    /// against the store and everything admitted earlier in this batch.
    pub fn admit(&mut self, candidate: &Candidate, mode: Mode) -> Result<Record, StoreError> {
        let record = admit(&mut self.working, candidate, mode, Utc::now())?;
        self.admitted += 1;
        Ok(record)
    }

    pub fn records(&self) -> &[Record] {
        &self.working.records
    }

    pub fn admitted(&self) -> usize {
        self.admitted
    }

    /// Persist the working copy. A batch that admitted nothing writes nothing.
    pub fn commit(self) -> Result<usize, StoreError> {
        if self.admitted == 0 {
            return Ok(0);
        }
        self.store.commit(self.working)?;
        info!(admitted = self.admitted, "batch committed");
        Ok(self.admitted)
    }
}

fn check_duplicate(
    records: &[Record],
    email: &str,
    mobile_number: &str,
    exclude: Option<RecordId>,
) -> Result<(), DuplicateConflict> {
    match detector::find_duplicate(email, mobile_number, records, exclude) {
        Some(conflict) => Err(conflict),
        None => Ok(()),
    }
}

fn build_fields(
    records: &[Record],
    candidate: &Candidate,
    mode: Mode,
) -> Result<RecordFields, StoreError> {
    match mode {
        Mode::Interactive => {
            let fields = validator::build(candidate)?;
            check_duplicate(records, &fields.email, &fields.mobile_number, None)?;
            Ok(fields)
        }
        Mode::Bulk => {
            let missing = validator::missing_bulk_fields(candidate);
            if !missing.is_empty() {
                return Err(Violation::MissingFields(missing).into());
            }
            let mobile = utils::digits_only(&candidate.mobile_number);
            check_duplicate(records, &candidate.email, &mobile, None)?;
            Ok(validator::build_lenient(candidate)?)
        }
    }
}

// the single admission path shared by create and batch imports
fn admit(
    state: &mut Snapshot,
    candidate: &Candidate,
    mode: Mode,
    now: DateTime<Utc>,
) -> Result<Record, StoreError> {
    let fields = build_fields(&state.records, candidate, mode)?;
    if fields.sl_no >= state.current_record_id {
        state.current_record_id = fields.sl_no.saturating_add(1);
    }
    let record = Record {
        id: RecordId::new(),
        fields,
        created_at: now,
        updated_at: None,
    };
    state.records.push(record.clone());
    Ok(record)
}

fn mark_email_copy(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{local}{COPY_MARKER}@{domain}"),
        None => format!("{email}{COPY_MARKER}"),
    }
}
