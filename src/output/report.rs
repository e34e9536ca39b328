use chrono::{DateTime, Utc};

use super::{ExportRow, EXPORT_HEADERS};
use crate::utils::{self, escape_html};

const STYLE: &str = r#"        table { border-collapse: collapse; width: 100%; font-family: Arial, sans-serif; }
        th, td { border: 1px solid #000; padding: 8px; text-align: left; }
        th { background-color: #f2f2f2; font-weight: bold; }
        .date { mso-number-format: "dd/mm/yyyy"; }"#;

/// Standalone HTML table that spreadsheet applications open directly. The
/// mobile column is marked as text so leading zeros survive.
pub fn render_html(rows: &[ExportRow], generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("    <meta charset=\"UTF-8\">\n");
    out.push_str("    <title>BGD Records Export</title>\n");
    out.push_str("    <style>\n");
    out.push_str(STYLE);
    out.push_str("\n    </style>\n</head>\n<body>\n");
    out.push_str("    <h1>BGD Records Export</h1>\n");
    out.push_str(&format!(
        "    <p>Generated on: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str("    <table>\n        <thead>\n            <tr>\n");
    for header in EXPORT_HEADERS {
        out.push_str(&format!("                <th>{header}</th>\n"));
    }
    out.push_str("            </tr>\n        </thead>\n        <tbody>\n");

    for r in rows {
        out.push_str("            <tr>\n");
        push_cell(&mut out, &r.sl_no.to_string());
        push_cell(&mut out, &r.email);
        out.push_str(&format!(
            "                <td style=\"mso-number-format:'\\@'\">{}</td>\n",
            escape_html(&r.mobile_number)
        ));
        push_cell(&mut out, &r.login_password);
        push_cell(&mut out, &r.email_password);
        push_cell(&mut out, &r.ivac_center);
        push_cell(&mut out, &r.assigned_person);
        push_cell(&mut out, &r.total_bgd_file.to_string());
        push_date_cell(&mut out, &utils::format_iso_date(r.file_starting_date));
        push_date_cell(&mut out, &r.success_date_iso());
        push_cell(&mut out, &r.note);
        push_cell(&mut out, r.status);
        out.push_str("            </tr>\n");
    }

    out.push_str("        </tbody>\n    </table>\n</body>\n</html>\n");
    out.into_bytes()
}

fn push_cell(out: &mut String, value: &str) {
    out.push_str(&format!("                <td>{}</td>\n", escape_html(value)));
}

fn push_date_cell(out: &mut String, value: &str) {
    out.push_str(&format!(
        "                <td class=\"date\">{}</td>\n",
        escape_html(value)
    ));
}
