use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::record::RecordId;
use crate::utils::parse_date_arg;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bgdtrack",
    version,
    about = "BGD file record tracker",
    long_about = "bgdtrack keeps a local list of BGD file processing records: who handles each file, at which IVAC center, and when it started and succeeded.\n\nExamples:\n  bgdtrack add --email a@gmail.com --mobile 01711111111 --assigned-person Rina --center Dhaka --total-files 2 --start-date 2024-01-15\n  bgdtrack list --center Dhaka --from 2024-01-01\n  bgdtrack export --format html\n  bgdtrack import records.csv\n\nTip: Use --config to keep the data file location and admin password in one place."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv). RUST_LOG takes precedence."
    )]
    pub verbose: u8,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.bgdtrack/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'd',
        long = "data",
        visible_alias = "data-file",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Records file (defaults to ~/.bgdtrack/records.json)."
    )]
    pub data_file: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Add a record. The serial number defaults to the next free one.")]
    Add(RecordArgs),

    #[command(about = "Update a record. Only the given fields change; all rules are re-checked.")]
    Update {
        #[arg(value_name = "ID", help = "Record id as shown by `list`.")]
        id: RecordId,

        #[command(flatten)]
        record: RecordArgs,
    },

    #[command(about = "Delete a record (password protected).")]
    Delete {
        #[arg(value_name = "ID", help = "Record id as shown by `list`.")]
        id: RecordId,

        #[arg(
            short = 'p',
            long = "password",
            value_name = "PASSWORD",
            help = "Admin password. Prompted for when omitted."
        )]
        password: Option<String>,
    },

    #[command(about = "Delete every record and reset the serial counter (password protected).")]
    Clear {
        #[arg(
            short = 'p',
            long = "password",
            value_name = "PASSWORD",
            help = "Admin password. Prompted for when omitted."
        )]
        password: Option<String>,
    },

    #[command(about = "Copy a record under the next serial number.")]
    Duplicate {
        #[arg(value_name = "ID", help = "Record id as shown by `list`.")]
        id: RecordId,
    },

    #[command(about = "Show records, newest serial first.")]
    List(FilterArgs),

    #[command(about = "Export the filtered records to CSV, HTML, JSON or text.")]
    Export(ExportArgs),

    #[command(about = "Import records from a CSV file with a header row.")]
    Import {
        #[arg(value_name = "FILE", help = "CSV file to import.")]
        file: String,
    },

    #[command(about = "Import pasted spreadsheet rows (no header, fixed column order).")]
    Paste {
        #[arg(value_name = "FILE", help = "File holding the pasted rows. Reads stdin when omitted.")]
        file: Option<String>,
    },

    #[command(about = "Write a CSV template with two sample rows.")]
    Template {
        #[arg(
            short = 'o',
            long = "output",
            value_name = "FILE",
            help = "Destination (defaults to bgd_records_template.csv)."
        )]
        output: Option<String>,
    },

    #[command(about = "Print the serial number the next record will get.")]
    NextSerial,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    #[arg(long = "sl-no", value_name = "N", help_heading = "Record", help = "Serial number.")]
    pub sl_no: Option<String>,

    #[arg(long = "email", value_name = "EMAIL", help_heading = "Record", help = "Email address.")]
    pub email: Option<String>,

    #[arg(
        long = "mobile",
        visible_alias = "mobile-number",
        value_name = "NUMBER",
        help_heading = "Record",
        help = "Mobile number, 11 digits. Separators are ignored."
    )]
    pub mobile_number: Option<String>,

    #[arg(
        long = "login-password",
        value_name = "TEXT",
        help_heading = "Record",
        help = "Login password (defaults to the configured placeholder on add)."
    )]
    pub login_password: Option<String>,

    #[arg(long = "email-password", value_name = "TEXT", help_heading = "Record", help = "Email password.")]
    pub email_password: Option<String>,

    #[arg(
        long = "assigned-person",
        value_name = "NAME",
        help_heading = "Record",
        help = "Person assigned to this BGD file."
    )]
    pub assigned_person: Option<String>,

    #[arg(
        long = "center",
        visible_alias = "ivac-center",
        value_name = "NAME",
        help_heading = "Record",
        help = "IVAC center."
    )]
    pub ivac_center: Option<String>,

    #[arg(
        long = "total-files",
        visible_alias = "total-bgd-file",
        value_name = "N",
        help_heading = "Record",
        help = "Total BGD files."
    )]
    pub total_bgd_file: Option<String>,

    #[arg(
        long = "start-date",
        value_name = "YYYY-MM-DD",
        help_heading = "Record",
        help = "File starting date."
    )]
    pub file_starting_date: Option<String>,

    #[arg(
        long = "success-date",
        value_name = "YYYY-MM-DD",
        help_heading = "Record",
        help = "File success date. Pass an empty value to clear it."
    )]
    pub file_success_date: Option<String>,

    #[arg(long = "note", value_name = "TEXT", help_heading = "Record", help = "Free-form note.")]
    pub note: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    #[arg(
        short = 's',
        long = "search",
        value_name = "TERM",
        help_heading = "Filters",
        help = "Match email, mobile, center or login password (case-insensitive)."
    )]
    pub search: Option<String>,

    #[arg(
        long = "center",
        value_name = "NAME",
        help_heading = "Filters",
        help = "Only records from this IVAC center (exact match)."
    )]
    pub center: Option<String>,

    #[arg(
        long = "from",
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help_heading = "Filters",
        help = "Earliest file starting date (inclusive)."
    )]
    pub date_from: Option<NaiveDate>,

    #[arg(
        long = "to",
        value_name = "YYYY-MM-DD",
        value_parser = parse_date_arg,
        help_heading = "Filters",
        help = "Latest file starting date (inclusive)."
    )]
    pub date_to: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(
        short = 'f',
        long = "format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "csv, html, json or text (inferred from --output when omitted)."
    )]
    pub format: Option<String>,

    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Destination file (defaults to bgd_records_export_<date>.<ext>). Use - for stdout."
    )]
    pub output: Option<String>,
}
