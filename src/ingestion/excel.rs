#![cfg(feature = "excel")]

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};

use crate::error::{ReadError, ReadResult};
use crate::types::{Schema, Table, TableSet, Value};

use super::headers::unique_column_names;

/// Read every sheet of a workbook (`.xlsx`, `.xls`, ...) into a [`TableSet`].
///
/// Behavior:
/// - One table per sheet, keyed by sheet name, in workbook order
/// - The first non-empty row of each sheet is the header row
/// - Fully blank rows are dropped, before and after the header
/// - A sheet with no non-empty rows becomes an empty table
/// - Cells keep their spreadsheet type; normalization happens later
pub fn read_workbook_from_path(path: impl AsRef<Path>) -> ReadResult<TableSet> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = workbook.sheet_names().to_vec();
    if sheets.is_empty() {
        return Err(ReadError::EmptyWorkbook);
    }
    log::debug!("workbook sheets: {sheets:?}");

    let mut set = TableSet::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let table = read_sheet_range(&range);
        set.insert(sheet, table);
    }
    Ok(set)
}

/// Read a single named sheet.
pub fn read_sheet_from_path(path: impl AsRef<Path>, sheet_name: &str) -> ReadResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range(sheet_name)?;
    Ok(read_sheet_range(&range))
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|c| matches!(c, Data::Empty))
}

fn read_sheet_range(range: &Range<Data>) -> Table {
    let mut rows_iter = range.rows().filter(|row| !is_blank_row(row));

    let Some(header_cells) = rows_iter.next() else {
        return Table::default();
    };
    let names = unique_column_names(header_cells.iter().map(cell_to_header_string));
    let width = names.len();

    let rows = rows_iter
        .map(|row| {
            let mut out: Vec<Value> = row.iter().take(width).map(convert_cell).collect();
            out.resize(width, Value::Null);
            out
        })
        .collect();

    Table::new(Schema::utf8(names), rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Empty => String::new(),
        other => cell_to_string(other),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) if f.is_nan() => Value::Null,
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::Utf8(cell_to_string(other)),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.to_string())
            .unwrap_or_else(|| c.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        _ => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_first_non_empty_row() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((1, 0), Data::String("id".into()));
        range.set_value((1, 1), Data::String("flag".into()));
        range.set_value((2, 0), Data::Float(1.0));
        range.set_value((2, 1), Data::Bool(true));
        range.set_value((3, 0), Data::Int(2));

        let t = read_sheet_range(&range);
        assert_eq!(t.schema.field_names().collect::<Vec<_>>(), vec!["id", "flag"]);
        assert_eq!(t.rows[0], vec![Value::Float64(1.0), Value::Bool(true)]);
        assert_eq!(t.rows[1], vec![Value::Int64(2), Value::Null]);
    }

    #[test]
    fn blank_rows_inside_the_data_are_dropped() {
        let mut range: Range<Data> = Range::new((0, 0), (4, 1));
        range.set_value((0, 0), Data::String("visit".into()));
        range.set_value((0, 1), Data::String("value".into()));
        range.set_value((1, 0), Data::Int(1));
        range.set_value((3, 1), Data::Float(12.5));

        let t = read_sheet_range(&range);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.rows[0], vec![Value::Int64(1), Value::Null]);
        assert_eq!(t.rows[1], vec![Value::Null, Value::Float64(12.5)]);
    }

    #[test]
    fn empty_range_is_empty_table() {
        let range: Range<Data> = Range::empty();
        assert_eq!(read_sheet_range(&range), Table::default());
    }
}
