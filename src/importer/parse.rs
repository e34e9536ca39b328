const BOM: char = '\u{feff}';

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Split CSV text into records. Newlines inside quoted cells stay part of the
/// record; `\r\n` endings are accepted; blank records are dropped.
pub fn split_records(text: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\n' if !in_quotes => {
                push_record(&mut records, &mut current);
            }
            _ => current.push(ch),
        }
    }
    push_record(&mut records, &mut current);
    records
}

fn push_record(records: &mut Vec<String>, current: &mut String) {
    let record = std::mem::take(current);
    let record = record.strip_suffix('\r').unwrap_or(&record);
    if !record.trim().is_empty() {
        records.push(record.to_string());
    }
}

/// Quoted-comma cell parsing: `"` toggles quoting, `""` inside quotes is a
/// literal quote, commas outside quotes separate cells. Cells are trimmed.
pub fn parse_csv_row(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => cells.push(finish_cell(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(finish_cell(&mut current));
    cells
}

fn finish_cell(current: &mut String) -> String {
    std::mem::take(current).trim().to_string()
}

/// One pasted line: tab separated when it contains a tab, CSV otherwise.
pub fn split_paste_line(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.contains('\t') {
        line.split('\t').map(|c| c.trim().to_string()).collect()
    } else {
        parse_csv_row(line)
    }
}
