use crate::cli::args::{CliArgs, Command, FilterArgs};
use crate::output::OutputFormat;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    match &args.command {
        Command::List(filters) => validate_filters(filters),
        Command::Export(export) => {
            validate_filters(&export.filters)?;
            if let Some(raw) = export.format.as_deref() {
                OutputFormat::parse(raw).ok_or_else(|| {
                    format!("invalid --format '{raw}', expected csv, html, json or text")
                })?;
            }
            Ok(())
        }
        Command::Import { file } if file.trim().is_empty() => {
            Err("import needs a CSV file path".to_string())
        }
        _ => Ok(()),
    }
}

fn validate_filters(filters: &FilterArgs) -> Result<(), String> {
    if let (Some(from), Some(to)) = (filters.date_from, filters.date_to) {
        if from > to {
            return Err(format!("invalid date range, --from {from} is after --to {to}"));
        }
    }
    Ok(())
}
