use bgdtrack::importer;
use bgdtrack::store::{MemoryStorage, RecordStore};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut store = RecordStore::open(MemoryStorage::new());
    let csv = "Sl No,Email,Phone,Password,Center,Total BGD File,Start Date,Notes\n\
               1,user1@gmail.com,01711111111,123456,Dhaka,5,2024-01-15,first batch\n\
               2,user2@gmail.com,01811111111,123456,,3,2024-01-16,\n\
               3,USER1@gmail.com,01911111111,123456,Sylhet,1,2024-01-17,\n";
    let report = importer::import_csv(&mut store, csv)?;

    println!("{}", report.summary());
    for error in report.errors.iter() {
        println!("  {error}");
    }
    println!("Next serial: {}", store.next_serial());

    Ok(())
}
