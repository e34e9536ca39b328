use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use tracing::{debug, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::args::{CliArgs, Command, ExportArgs, FilterArgs, RecordArgs};
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::gate::{AccessGate, DEFAULT_ADMIN_PASSWORD};
use crate::importer::{self, ImportReport};
use crate::output::{self, OutputFormat};
use crate::record::{Candidate, RecordId};
use crate::schema::Field;
use crate::store::{JsonFileStorage, RecordStore, Storage};
use crate::view::{self, RecordCount, ViewCriteria};

const TEMPLATE_FILENAME: &str = "bgd_records_template.csv";
const STDOUT_TARGET: &str = "-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tone {
    Success,
    Warning,
    Info,
}

#[derive(Debug)]
struct Session {
    data_file: PathBuf,
    admin_password: String,
    default_login_password: String,
    output_format: Option<OutputFormat>,
    no_color: bool,
}

fn build_session(args: &CliArgs, cfg: ConfigFile) -> Result<Session, String> {
    validation::validate(args)?;

    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let data_file = args
        .data_file
        .clone()
        .or(cfg.data_file)
        .map(|p| config::expand_tilde(&p))
        .unwrap_or_else(config::default_data_path);

    let admin_password = cfg
        .admin_password
        .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());
    let default_login_password = cfg
        .default_login_password
        .unwrap_or_else(|| config::DEFAULT_LOGIN_PASSWORD.to_string());

    let output_format = match cfg.output_format.as_deref() {
        Some(raw) => Some(OutputFormat::parse(raw).ok_or_else(|| {
            format!("invalid output_format '{raw}' in config, expected csv, html, json or text")
        })?),
        None => None,
    };

    Ok(Session {
        data_file,
        admin_password,
        default_login_password,
        output_format,
        no_color,
    })
}

fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .try_init();
}

fn say<W: Write>(out: &mut W, tone: Tone, message: &str) -> Result<(), String> {
    let line = match tone {
        Tone::Success => message.green().to_string(),
        Tone::Warning => message.yellow().to_string(),
        Tone::Info => message.to_string(),
    };
    writeln!(out, "{line}").map_err(|e| format!("failed to write output: {e}"))
}

fn write_text_file(path: &Path, contents: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory '{}': {e}", parent.display()))?;
        }
    }
    fs::write(path, contents).map_err(|e| format!("failed to write '{}': {e}", path.display()))
}

fn read_text_file(path: &str) -> Result<String, String> {
    let path = config::expand_tilde(path);
    fs::read_to_string(&path).map_err(|e| format!("failed to read '{}': {e}", path.display()))
}

fn apply_record_args(candidate: &mut Candidate, args: RecordArgs) {
    let values = [
        (Field::SlNo, args.sl_no),
        (Field::Email, args.email),
        (Field::MobileNumber, args.mobile_number),
        (Field::LoginPassword, args.login_password),
        (Field::EmailPassword, args.email_password),
        (Field::AssignedPerson, args.assigned_person),
        (Field::IvacCenter, args.ivac_center),
        (Field::TotalBgdFile, args.total_bgd_file),
        (Field::FileStartingDate, args.file_starting_date),
        (Field::FileSuccessDate, args.file_success_date),
        (Field::Note, args.note),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            candidate.set(field, value);
        }
    }
}

fn criteria_from(filters: FilterArgs) -> ViewCriteria {
    ViewCriteria {
        search: filters.search,
        center: filters.center,
        date_from: filters.date_from,
        date_to: filters.date_to,
    }
}

/// Ask for the admin password unless it was given on the command line.
fn authorize<R: BufRead, W: Write>(
    session: &Session,
    action: &str,
    password: Option<String>,
    input: &mut R,
    out: &mut W,
) -> Result<(), String> {
    let entered = match password {
        Some(p) => p,
        None => {
            write!(out, "Please enter password to {action}: ")
                .and_then(|_| out.flush())
                .map_err(|e| format!("failed to write output: {e}"))?;
            let mut line = String::new();
            input
                .read_line(&mut line)
                .map_err(|e| format!("failed to read password: {e}"))?;
            line
        }
    };
    AccessGate::new(session.admin_password.as_str())
        .authorize(&entered)
        .map_err(|e| e.to_string())
}

fn report_import<W: Write>(out: &mut W, report: &ImportReport) -> Result<(), String> {
    let tone = if report.imported_count() > 0 {
        Tone::Success
    } else {
        Tone::Warning
    };
    say(out, tone, &report.summary())?;
    if !report.errors.is_empty() {
        say(
            out,
            Tone::Warning,
            &format!("{} errors occurred during import:", report.errors.len()),
        )?;
        for error in &report.errors {
            say(out, Tone::Warning, &format!("  {error}"))?;
        }
    }
    Ok(())
}

fn resolve_export_format(session: &Session, args: &ExportArgs) -> OutputFormat {
    if let Some(format) = args.format.as_deref().and_then(OutputFormat::parse) {
        return format;
    }
    if let Some(format) = args
        .output
        .as_deref()
        .and_then(output::infer_format_from_path)
    {
        return format;
    }
    session.output_format.unwrap_or(OutputFormat::Csv)
}

fn export<S: Storage, W: Write>(
    session: &Session,
    store: &RecordStore<S>,
    args: ExportArgs,
    out: &mut W,
) -> Result<(), String> {
    if store.is_empty() {
        return say(out, Tone::Warning, "No records to export!");
    }
    let format = resolve_export_format(session, &args);
    let criteria = criteria_from(args.filters);
    let view = view::filtered_view(store.records(), &criteria);
    let now = Utc::now();
    let body = output::render(format, &output::build_rows(&view), now)
        .map_err(|e| format!("failed to render {}: {e}", format.describe()))?;

    match args.output.as_deref() {
        Some(STDOUT_TARGET) => out
            .write_all(&body)
            .map_err(|e| format!("failed to write output: {e}")),
        target => {
            let path = match target {
                Some(p) => config::expand_tilde(p),
                None => PathBuf::from(output::default_export_filename(
                    format,
                    now.date_naive(),
                )),
            };
            write_text_file(&path, &body)?;
            debug!(path = %path.display(), ?format, "export written");
            say(
                out,
                Tone::Success,
                &format!(
                    "{} records exported to {}! ({})",
                    view.len(),
                    format.describe(),
                    path.display()
                ),
            )
        }
    }
}

fn list<S: Storage, W: Write>(
    store: &RecordStore<S>,
    filters: FilterArgs,
    out: &mut W,
) -> Result<(), String> {
    let criteria = criteria_from(filters);
    let view = view::filtered_view(store.records(), &criteria);
    let count = RecordCount::new(view.len(), store.len());
    if view.is_empty() {
        say(out, Tone::Warning, "No records found.")?;
    } else {
        out.write_all(&output::render_text(&output::build_rows(&view)))
            .map_err(|e| format!("failed to write output: {e}"))?;
    }
    say(out, Tone::Info, &format!("Showing {count} records"))
}

fn execute<S, R, W>(
    session: &Session,
    store: &mut RecordStore<S>,
    command: Command,
    input: &mut R,
    out: &mut W,
) -> Result<(), String>
where
    S: Storage,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Add(record) => {
            let mut candidate = Candidate::default()
                .with(Field::SlNo, store.next_serial().to_string())
                .with(Field::LoginPassword, session.default_login_password.as_str());
            apply_record_args(&mut candidate, record);
            let created = store.create(&candidate).map_err(|e| e.to_string())?;
            say(out, Tone::Success, "Record added successfully!")?;
            say(
                out,
                Tone::Info,
                &format!("id: {}  serial: {}", created.id, created.fields.sl_no),
            )
        }
        Command::Update { id, record } => {
            let existing = store
                .get(id)
                .ok_or_else(|| format!("Record {id} not found"))?;
            let mut candidate = Candidate::from(&existing.fields);
            apply_record_args(&mut candidate, record);
            store.update(id, &candidate).map_err(|e| e.to_string())?;
            say(out, Tone::Success, "Record updated successfully!")
        }
        Command::Delete { id, password } => {
            ensure_exists(store, id)?;
            authorize(session, "delete this record", password, input, out)?;
            store.delete(id).map_err(|e| e.to_string())?;
            say(out, Tone::Success, "Record deleted successfully!")
        }
        Command::Clear { password } => {
            authorize(session, "clear all records", password, input, out)?;
            store.clear().map_err(|e| e.to_string())?;
            say(out, Tone::Success, "All records cleared successfully!")
        }
        Command::Duplicate { id } => {
            let copy = store.duplicate(id).map_err(|e| e.to_string())?;
            say(
                out,
                Tone::Success,
                "Record duplicated successfully! Please update email and mobile number to remove duplicate markers.",
            )?;
            say(
                out,
                Tone::Info,
                &format!("id: {}  serial: {}", copy.id, copy.fields.sl_no),
            )
        }
        Command::List(filters) => list(store, filters, out),
        Command::Export(args) => export(session, store, args, out),
        Command::Import { file } => {
            let text = read_text_file(&file)?;
            let report = importer::import_csv(store, &text).map_err(|e| e.to_string())?;
            report_import(out, &report)
        }
        Command::Paste { file } => {
            let text = match file {
                Some(path) => read_text_file(&path)?,
                None => {
                    let mut buf = String::new();
                    input
                        .read_to_string(&mut buf)
                        .map_err(|e| format!("failed to read stdin: {e}"))?;
                    buf
                }
            };
            let report = importer::import_paste(store, &text).map_err(|e| e.to_string())?;
            report_import(out, &report)
        }
        Command::Template { output } => {
            let path = config::expand_tilde(output.as_deref().unwrap_or(TEMPLATE_FILENAME));
            write_text_file(&path, &output::render_template())?;
            say(
                out,
                Tone::Success,
                &format!("Template CSV written to {}!", path.display()),
            )
        }
        Command::NextSerial => say(out, Tone::Info, &store.next_serial().to_string()),
    }
}

fn ensure_exists<S: Storage>(store: &RecordStore<S>, id: RecordId) -> Result<(), String> {
    match store.get(id) {
        Some(_) => Ok(()),
        None => Err(format!("Record {id} not found")),
    }
}

fn load_session_config(args: &CliArgs) -> Result<ConfigFile, String> {
    if let Some(path) = args.config.as_deref() {
        return config::load_config(&config::expand_tilde(path), false);
    }
    match config::default_config_path() {
        Some(path) => {
            if let Err(e) = config::ensure_default_config_file(&path) {
                warn!(error = %e, "could not create default config");
            }
            config::load_config(&path, true)
        }
        None => Ok(ConfigFile::default()),
    }
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                print!("{e}");
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };

    init_logging(args.verbose);

    let cfg = load_session_config(&args)?;
    let session = build_session(&args, cfg)?;
    if session.no_color {
        colored::control::set_override(false);
    }
    debug!(data_file = %session.data_file.display(), "session ready");

    let mut store = RecordStore::open(JsonFileStorage::new(&session.data_file));
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&session, &mut store, args.command, &mut input, &mut out)
}
