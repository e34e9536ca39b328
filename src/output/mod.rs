pub mod report;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::record::Record;
use crate::utils;

pub const BOM: &str = "\u{feff}";

pub const EXPORT_HEADERS: [&str; 12] = [
    "Sl No",
    "Email",
    "Mobile Number",
    "Login Password",
    "Email Password",
    "IVAC Center",
    "Assigned Person",
    "Total BGD File",
    "File Starting Date",
    "File Success Date",
    "Note",
    "Status",
];

const TEMPLATE_ROWS: [[&str; 12]; 2] = [
    [
        "1",
        "user1@gmail.com",
        "+8801234567890",
        "123456",
        "email123",
        "Dhaka",
        "John Doe",
        "5",
        "2024-01-15",
        "2024-01-20",
        "Sample note",
        "Done",
    ],
    [
        "2",
        "user2@gmail.com",
        "+8801987654321",
        "123456",
        "email456",
        "Chittagong",
        "Jane Smith",
        "3",
        "2024-01-16",
        "",
        "Another note",
        "Processing",
    ],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Html,
    Json,
    Text,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "html" | "htm" | "excel" => Some(Self::Html),
            "json" => Some(Self::Json),
            "text" | "txt" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Json => "json",
            Self::Text => "txt",
        }
    }

    /// Human description used in the "N records exported to ..." message.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Html => "Excel-compatible HTML",
            Self::Json => "JSON",
            Self::Text => "text",
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".csv") {
        return Some(OutputFormat::Csv);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") || lower.ends_with(".xls") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// `bgd_records_export_2024-01-15.csv`
pub fn default_export_filename(format: OutputFormat, date: NaiveDate) -> String {
    format!(
        "bgd_records_export_{}.{}",
        utils::format_iso_date(date),
        format.extension()
    )
}

/// One exported line. Optional values are flattened to empty strings and
/// status is derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub sl_no: u64,
    pub email: String,
    pub mobile_number: String,
    pub login_password: String,
    pub email_password: String,
    pub ivac_center: String,
    pub assigned_person: String,
    pub total_bgd_file: u64,
    pub file_starting_date: NaiveDate,
    pub file_success_date: Option<NaiveDate>,
    pub note: String,
    pub status: &'static str,
}

impl From<&Record> for ExportRow {
    fn from(record: &Record) -> Self {
        let f = &record.fields;
        Self {
            id: record.id.to_string(),
            sl_no: f.sl_no,
            email: f.email.clone(),
            mobile_number: f.mobile_number.clone(),
            login_password: f.login_password.clone(),
            email_password: f.email_password.clone().unwrap_or_default(),
            ivac_center: f.ivac_center.clone(),
            assigned_person: f.assigned_person.clone(),
            total_bgd_file: f.total_bgd_file,
            file_starting_date: f.file_starting_date,
            file_success_date: f.file_success_date,
            note: f.note.clone().unwrap_or_default(),
            status: record.status().label(),
        }
    }
}

impl ExportRow {
    fn success_date_iso(&self) -> String {
        self.file_success_date
            .map(utils::format_iso_date)
            .unwrap_or_default()
    }
}

pub fn build_rows(records: &[&Record]) -> Vec<ExportRow> {
    records.iter().map(|r| ExportRow::from(*r)).collect()
}

pub fn render(
    format: OutputFormat,
    rows: &[ExportRow],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, serde_json::Error> {
    Ok(match format {
        OutputFormat::Csv => render_csv(rows),
        OutputFormat::Html => render_html(rows, generated_at),
        OutputFormat::Json => render_json(rows)?,
        OutputFormat::Text => render_text(rows),
    })
}

fn push_header_line(out: &mut String) {
    out.push_str(BOM);
    out.push_str(&EXPORT_HEADERS.join(","));
    out.push('\n');
}

/// Spreadsheet CSV: BOM, bare header row, every cell quoted except a digit
/// mobile number which is written as `="0..."` to keep its leading zero.
pub fn render_csv(rows: &[ExportRow]) -> Vec<u8> {
    let mut out = String::new();
    push_header_line(&mut out);
    let lines = rows
        .iter()
        .map(|r| {
            [
                utils::csv_quote(&r.sl_no.to_string()),
                utils::csv_quote(&r.email),
                utils::format_mobile_for_export(&r.mobile_number),
                utils::csv_quote(&r.login_password),
                utils::csv_quote(&r.email_password),
                utils::csv_quote(&r.ivac_center),
                utils::csv_quote(&r.assigned_person),
                utils::csv_quote(&r.total_bgd_file.to_string()),
                utils::csv_quote(&utils::format_iso_date(r.file_starting_date)),
                utils::csv_quote(&r.success_date_iso()),
                utils::csv_quote(&r.note),
                utils::csv_quote(r.status),
            ]
            .join(",")
        })
        .collect::<Vec<_>>();
    out.push_str(&lines.join("\n"));
    out.into_bytes()
}

pub fn render_json(rows: &[ExportRow]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = serde_json::to_vec_pretty(rows)?;
    out.push(b'\n');
    Ok(out)
}

const TEXT_HEADERS: [&str; 10] = [
    "ID",
    "Sl No",
    "Email",
    "Mobile Number",
    "IVAC Center",
    "Assigned Person",
    "Files",
    "Started",
    "Succeeded",
    "Status",
];

/// Aligned terminal table with day-first dates.
pub fn render_text(rows: &[ExportRow]) -> Vec<u8> {
    let cells: Vec<[String; 10]> = rows
        .iter()
        .map(|r| {
            [
                r.id.clone(),
                r.sl_no.to_string(),
                r.email.clone(),
                r.mobile_number.clone(),
                r.ivac_center.clone(),
                r.assigned_person.clone(),
                r.total_bgd_file.to_string(),
                utils::format_display_date(r.file_starting_date),
                r.file_success_date
                    .map(utils::format_display_date)
                    .unwrap_or_else(|| "-".to_string()),
                r.status.to_string(),
            ]
        })
        .collect();

    let mut widths = TEXT_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = TEXT_HEADERS.iter().map(|h| h.to_string()).collect();
    push_text_row(&mut out, &header, &widths);
    for row in &cells {
        push_text_row(&mut out, row, &widths);
    }
    out.into_bytes()
}

fn push_text_row(out: &mut String, row: &[String], widths: &[usize]) {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{cell:<w$}", w = *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn render_html(rows: &[ExportRow], generated_at: DateTime<Utc>) -> Vec<u8> {
    report::render_html(rows, generated_at)
}

/// Import template: BOM, header row and two quoted sample rows.
pub fn render_template() -> Vec<u8> {
    let mut out = String::new();
    push_header_line(&mut out);
    let lines = TEMPLATE_ROWS
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| utils::csv_quote(cell))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>();
    out.push_str(&lines.join("\n"));
    out.into_bytes()
}
