//! Delimited-text reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ReadError, ReadResult};
use crate::types::{DataType, Schema, Table, Value};

use super::headers::unique_column_names;
use super::sniffer::{resolve_delimiter, sniff_delimiter};

/// Cell spellings read as missing.
pub const NA_VALUES: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Spellings of `true` and `false` for boolean columns.
pub const TRUE_VALUES: [&str; 3] = ["True", "TRUE", "true"];
pub const FALSE_VALUES: [&str; 3] = ["False", "FALSE", "false"];

/// Read a delimited text file into a raw (not yet normalized) [`Table`].
///
/// Rules:
///
/// - The delimiter is sniffed from the first line (see [`sniff_path_delimiter`]).
/// - The first record is the header row.
/// - Fields listed in [`NA_VALUES`] become [`Value::Null`]; everything else is [`Value::Utf8`].
/// - A column whose present fields all spell a boolean ([`TRUE_VALUES`], [`FALSE_VALUES`])
///   becomes a [`DataType::Bool`] column.
/// - Short rows are padded with nulls; long rows are an error.
pub fn read_csv_from_path(path: impl AsRef<Path>) -> ReadResult<Table> {
    let path = path.as_ref();
    let delimiter = sniff_path_delimiter(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    read_csv_from_reader(&mut rdr)
}

/// Sniff the delimiter from the first line of `path` and apply the space policy.
///
/// The file is opened, read up to the first newline, and closed before this returns.
pub fn sniff_path_delimiter(path: impl AsRef<Path>) -> ReadResult<u8> {
    let path = path.as_ref();
    let first_line = read_first_line(path)?;
    let sniffed = sniff_delimiter(&first_line).ok_or(ReadError::UndeterminedDelimiter)?;
    let resolved = resolve_delimiter(sniffed);
    log::debug!(
        "sniffed delimiter {sniffed:?} (using {resolved:?}) for {}",
        path.display()
    );
    if resolved.is_ascii() {
        Ok(resolved as u8)
    } else {
        Err(ReadError::UnsupportedDelimiter(resolved))
    }
}

fn read_first_line(path: &Path) -> ReadResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    String::from_utf8(buf).map_err(|e| ReadError::Encoding {
        context: "first line".to_string(),
        source: e.utf8_error(),
    })
}

/// Read CSV data from an existing CSV reader.
///
/// The reader must be configured with `has_headers(true)`; `flexible(true)` lets short rows
/// through so they can be padded.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> ReadResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(ReadError::malformed("csv", "no columns to parse from file"));
    }
    let names = unique_column_names(headers.iter());
    let width = names.len();

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > width {
            // 1-based, +1 again because the header is line 1.
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(row_idx0 as u64 + 2);
            return Err(ReadError::RaggedRow {
                line,
                expected: width,
                found: record.len(),
            });
        }

        let mut row: Vec<Value> = Vec::with_capacity(width);
        row.extend(record.iter().map(to_cell));
        row.resize(width, Value::Null);
        rows.push(row);
    }

    let mut schema = Schema::utf8(names);
    for (idx, field) in schema.fields.iter_mut().enumerate() {
        if promote_bool_column(&mut rows, idx) {
            field.data_type = DataType::Bool;
        }
    }
    Ok(Table::new(schema, rows))
}

fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&raw) {
        Some(true)
    } else if FALSE_VALUES.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// Convert column `idx` to booleans if every present cell spells one.
fn promote_bool_column(rows: &mut [Vec<Value>], idx: usize) -> bool {
    let mut any = false;
    for row in rows.iter() {
        match &row[idx] {
            Value::Null => {}
            Value::Utf8(s) if parse_bool(s).is_some() => any = true,
            _ => return false,
        }
    }
    if !any {
        return false;
    }
    for row in rows.iter_mut() {
        if let Value::Utf8(s) = &row[idx] {
            let flag = parse_bool(s) == Some(true);
            row[idx] = Value::Bool(flag);
        }
    }
    true
}

fn to_cell(raw: &str) -> Value {
    if NA_VALUES.contains(&raw) {
        Value::Null
    } else {
        Value::Utf8(raw.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str, delimiter: u8) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn na_spellings_become_null() {
        let t = read_csv_from_reader(&mut reader("a,b\nNA,x\n,null\n", b',')).unwrap();
        assert_eq!(t.rows[0], vec![Value::Null, Value::from("x")]);
        assert_eq!(t.rows[1], vec![Value::Null, Value::Null]);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = read_csv_from_reader(&mut reader("a,b,c\n1\n", b',')).unwrap();
        assert_eq!(t.rows[0], vec![Value::from("1"), Value::Null, Value::Null]);
    }

    #[test]
    fn long_rows_are_rejected_with_line_number() {
        let err = read_csv_from_reader(&mut reader("a,b\n1,2\n1,2,3\n", b',')).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("expected 2 fields in line 3, saw 3"), "{msg}");
    }

    #[test]
    fn boolean_columns_are_promoted_only_when_every_cell_is_boolean() {
        let t = read_csv_from_reader(&mut reader("a,b\nTrue,true\n,maybe\nfalse,FALSE\n", b','))
            .unwrap();
        assert_eq!(t.schema.fields[0].data_type, DataType::Bool);
        assert_eq!(t.schema.fields[1].data_type, DataType::Utf8);
        let a: Vec<Value> = t.column(0).cloned().collect();
        assert_eq!(a, vec![Value::Bool(true), Value::Null, Value::Bool(false)]);
        assert_eq!(t.rows[1][1], Value::from("maybe"));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let t = read_csv_from_reader(&mut reader("a$b\n", b'$')).unwrap();
        assert_eq!(t.schema.field_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(t.row_count(), 0);
    }
}
