use chrono::Utc;

use crate::importer;
use crate::output;
use crate::record::{Candidate, RecordFields};
use crate::schema::Field;
use crate::store::{JsonFileStorage, MemoryStorage, RecordStore, StoreError};
use crate::validator;
use crate::view::{self, ViewCriteria};

fn candidate(sl_no: &str, email: &str, mobile: &str, center: &str, start: &str) -> Candidate {
    Candidate::default()
        .with(Field::SlNo, sl_no)
        .with(Field::Email, email)
        .with(Field::MobileNumber, mobile)
        .with(Field::LoginPassword, "123456")
        .with(Field::AssignedPerson, "P")
        .with(Field::IvacCenter, center)
        .with(Field::TotalBgdFile, "2")
        .with(Field::FileStartingDate, start)
}

fn seeded_store() -> RecordStore<MemoryStorage> {
    let mut store = RecordStore::open(MemoryStorage::new());
    let rows = [
        ("3", "a@gmail.com", "01711111111", "Dhaka", "2024-01-01"),
        ("9", "b@gmail.com", "01711111112", "Sylhet", "2024-01-05"),
        ("5", "c@yahoo.com", "01711111113", "Dhaka", "2024-02-10"),
        ("5", "d@gmail.com", "01711111114", "Dhaka", "2024-03-01"),
    ];
    for (sl, email, mobile, center, start) in rows {
        store
            .create(&candidate(sl, email, mobile, center, start))
            .unwrap();
    }
    store
}

#[test]
fn create_then_case_variant_email_is_rejected() {
    let mut store = RecordStore::open(MemoryStorage::new());
    let created = store
        .create(&candidate("1", "a@gmail.com", "01711111111", "Dhaka", "2024-01-01"))
        .unwrap();
    assert_eq!(store.records(), &[created]);

    let err = store
        .create(&candidate("2", "a@gmail.com", "01811111111", "Dhaka", "2024-01-01"))
        .unwrap_err();
    match err {
        StoreError::Duplicate(conflict) => {
            assert_eq!(conflict.field.field(), Field::Email);
            assert_eq!(conflict.value, "a@gmail.com");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(store.len(), 1);
}

#[test]
fn mobile_rule_depends_only_on_digit_count() {
    let inputs = [
        ("01711111111", true),
        ("+01711111111", true),
        ("0171-111-1111", true),
        ("(0171) 111 1111", true),
        ("+8801711111111", false),
        ("1711111111", false),
        ("017111111111", false),
    ];
    for (input, ok) in inputs {
        let c = candidate("1", "a@gmail.com", input, "Dhaka", "2024-01-01");
        assert_eq!(validator::validate(&c).is_ok(), ok, "{input}");
        assert_eq!(validator::is_valid_mobile(input), ok, "{input}");
    }
}

#[test]
fn filtered_view_is_idempotent_and_sorted() {
    let store = seeded_store();
    let criteria_set = [
        ViewCriteria::default(),
        ViewCriteria {
            search: Some("GMAIL".to_string()),
            ..Default::default()
        },
        ViewCriteria {
            center: Some("Dhaka".to_string()),
            date_from: chrono::NaiveDate::from_ymd_opt(2024, 1, 2),
            ..Default::default()
        },
    ];
    for criteria in &criteria_set {
        let once = view::filtered_view(store.records(), criteria);
        let twice = view::filtered_view(once.iter().copied(), criteria);
        assert_eq!(once, twice);
        for pair in once.windows(2) {
            assert!(pair[0].fields.sl_no >= pair[1].fields.sl_no);
        }
    }
}

#[test]
fn counter_stays_above_every_serial() {
    let mut store = seeded_store();
    let text = "12\tx@gmail.com\t01900000000\tpw\t\tDhaka\t\t1\t2024-01-01\t\t\n4\ty@gmail.com\t01900000001\tpw\t\tDhaka\t\t1\t2024-01-01\t\t";
    importer::import_paste(&mut store, text).unwrap();
    let max = store.records().iter().map(|r| r.fields.sl_no).max().unwrap();
    assert_eq!(max, 12);
    assert!(store.next_serial() > max);
}

#[test]
fn duplicated_record_does_not_conflict_with_original() {
    let mut store = RecordStore::open(MemoryStorage::new());
    let original = store
        .create(&candidate("1", "x@y.com", "01711111111", "Dhaka", "2024-01-01"))
        .unwrap();
    let copy = store.duplicate(original.id).unwrap();
    assert_eq!(copy.fields.email, "x_copy@y.com");
    assert_eq!(copy.fields.mobile_number, "01711111111_copy");

    // duplication skips the duplicate scan, so copying twice is allowed
    let again = store.duplicate(original.id).unwrap();
    assert_eq!(again.fields.email, "x_copy@y.com");
    assert_eq!(store.len(), 3);
}

#[test]
fn csv_export_reimports_same_business_fields() {
    let mut source = seeded_store();
    let with_extras = candidate("20", "e@gmail.com", "01811111111", "Khulna", "2024-04-01")
        .with(Field::EmailPassword, "mail, pass")
        .with(Field::FileSuccessDate, "2024-04-09")
        .with(Field::Note, "said \"later\"");
    source.create(&with_extras).unwrap();
    let formula_note = candidate("21", "f@gmail.com", "19999999999", "Dhaka", "2024-04-02")
        .with(Field::Note, "=42")
        .with(Field::LoginPassword, "=7");
    source.create(&formula_note).unwrap();
    importer::import_paste(
        &mut source,
        "22\tg@gmail.com\t+8801234567890\tpw\t\tDhaka\t\t1\t2024-04-03\t\t",
    )
    .unwrap();
    assert_eq!(source.len(), 7);

    let view = view::filtered_view(source.records(), &ViewCriteria::default());
    let csv = output::render_csv(&output::build_rows(&view));
    let text = String::from_utf8(csv).unwrap();

    let mut target = RecordStore::open(MemoryStorage::new());
    let report = importer::import_csv(&mut target, &text).unwrap();
    assert_eq!(report.imported_count(), source.len());
    assert!(report.errors.is_empty());

    let mut before: Vec<RecordFields> = source.records().iter().map(|r| r.fields.clone()).collect();
    let mut after: Vec<RecordFields> = target.records().iter().map(|r| r.fields.clone()).collect();
    before.sort_by(|a, b| a.email.cmp(&b.email));
    after.sort_by(|a, b| a.email.cmp(&b.email));
    assert_eq!(before, after);
}

#[test]
fn bulk_import_scenario_reports_row_two() {
    let mut store = RecordStore::open(MemoryStorage::new());
    let text = "Sl No,Email,Mobile Number,Login Password,IVAC Center,Total BGD File,File Starting Date\n\
                1,a@gmail.com,01711111111,123456,Dhaka,2,2024-01-01\n\
                2,b@gmail.com,01811111111,123456,,1,2024-01-02\n";
    let report = importer::import_csv(&mut store, text).unwrap();
    assert_eq!(report.imported_count(), 1);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 2);
    assert!(report.errors[0].to_string().contains("Missing required fields"));
}

#[test]
fn file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let id = {
        let mut store = RecordStore::open(JsonFileStorage::new(&path));
        store
            .create(&candidate("7", "a@gmail.com", "01711111111", "Dhaka", "2024-01-01"))
            .unwrap()
            .id
    };

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["currentRecordId"], 8);
    assert_eq!(raw["records"][0]["ivacCenter"], "Dhaka");

    let mut store = RecordStore::open(JsonFileStorage::new(&path));
    assert_eq!(store.next_serial(), 8);
    let updated = store
        .update(
            id,
            &candidate("7", "a@gmail.com", "01711111111", "Sylhet", "2024-01-01"),
        )
        .unwrap();
    assert!(updated.updated_at.unwrap() <= Utc::now());

    let store = RecordStore::open(JsonFileStorage::new(&path));
    assert_eq!(store.get(id).unwrap().fields.ivac_center, "Sylhet");
}
