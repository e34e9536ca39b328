use bgdtrack::output::{self, OutputFormat};
use bgdtrack::record::Candidate;
use bgdtrack::schema::Field;
use bgdtrack::store::{MemoryStorage, RecordStore};
use bgdtrack::view::{self, RecordCount, ViewCriteria};
use chrono::Utc;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut store = RecordStore::open(MemoryStorage::new());
    for (email, mobile, center) in [
        ("rina@gmail.com", "017-1111-1111", "Dhaka"),
        ("karim@gmail.com", "01811111111", "Sylhet"),
        ("nila@yahoo.com", "01911111111", "Dhaka"),
    ] {
        let candidate = Candidate::default()
            .with(Field::SlNo, store.next_serial().to_string())
            .with(Field::Email, email)
            .with(Field::MobileNumber, mobile)
            .with(Field::LoginPassword, "123456")
            .with(Field::AssignedPerson, "Rina")
            .with(Field::IvacCenter, center)
            .with(Field::TotalBgdFile, "1")
            .with(Field::FileStartingDate, "2024-01-15");
        store.create(&candidate)?;
    }

    let criteria = ViewCriteria {
        center: Some("Dhaka".to_string()),
        ..ViewCriteria::default()
    };
    let rows = view::filtered_view(store.records(), &criteria);
    println!("Records: {}", RecordCount::new(rows.len(), store.len()));

    let table = output::render(OutputFormat::Text, &output::build_rows(&rows), Utc::now())?;
    print!("{}", String::from_utf8_lossy(&table));

    let csv = output::render(OutputFormat::Csv, &output::build_rows(&rows), Utc::now())?;
    println!("\n{}", String::from_utf8_lossy(&csv));

    Ok(())
}
