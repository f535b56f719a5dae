#![cfg(feature = "excel")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use table_loader::Session;
use table_loader::ingestion::excel::{read_sheet_from_path, read_workbook_from_path};
use table_loader::ingestion::{LoadOptions, load_from_path};
use table_loader::types::{DataType, Value};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("table-loader-{name}-{nanos}.xlsx"))
}

/// `Sheet1`: id/name/score/active. `Sheet2`: a blank first row, then visit/value/label, where
/// `value` holds a number written as text next to a real number, with a blank row between the
/// two data rows.
fn write_two_sheet_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();

    let ws = wb.add_worksheet();
    ws.set_name("Sheet1").unwrap();
    ws.write_string(0, 0, "id").unwrap();
    ws.write_string(0, 1, "name").unwrap();
    ws.write_string(0, 2, "score").unwrap();
    ws.write_string(0, 3, "active").unwrap();
    ws.write_number(1, 0, 1).unwrap();
    ws.write_string(1, 1, "Ada").unwrap();
    ws.write_number(1, 2, 98.5).unwrap();
    ws.write_boolean(1, 3, true).unwrap();
    ws.write_number(2, 0, 2).unwrap();
    ws.write_string(2, 1, "Grace").unwrap();
    ws.write_number(2, 2, 87.25).unwrap();
    ws.write_boolean(2, 3, false).unwrap();

    let ws = wb.add_worksheet();
    ws.set_name("Sheet2").unwrap();
    ws.write_string(1, 0, "visit").unwrap();
    ws.write_string(1, 1, "value").unwrap();
    ws.write_string(1, 2, "label").unwrap();
    ws.write_number(2, 0, 1).unwrap();
    ws.write_string(2, 1, "10").unwrap();
    ws.write_string(2, 2, "baseline").unwrap();
    ws.write_number(4, 0, 2).unwrap();
    ws.write_number(4, 1, 12.5).unwrap();
    ws.write_string(4, 2, "week 1").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn workbook_loads_every_sheet_in_order() {
    let path = tmp_file("two-sheets");
    write_two_sheet_xlsx(&path);

    let set = load_from_path(&path, &LoadOptions::default()).unwrap();
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["Sheet1", "Sheet2"]);

    let s1 = set.get("Sheet1").unwrap();
    let types: Vec<DataType> = s1.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Int64,
            DataType::Utf8,
            DataType::Float64,
            DataType::Bool
        ]
    );
    assert_eq!(
        s1.rows[0],
        vec![
            Value::Int64(1),
            Value::from("Ada"),
            Value::Float64(98.5),
            Value::Bool(true),
        ]
    );

    let s2 = set.get("Sheet2").unwrap();
    assert_eq!(
        s2.schema.field_names().collect::<Vec<_>>(),
        vec!["visit", "value", "label"]
    );
    assert_eq!(s2.row_count(), 2);
    let values: Vec<Value> = s2.column(1).cloned().collect();
    assert_eq!(values, vec![Value::Float64(10.0), Value::Float64(12.5)]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn selecting_a_sheet_scopes_the_summary() {
    let path = tmp_file("select");
    write_two_sheet_xlsx(&path);

    let session = Session::new().load(&path, &LoadOptions::default()).unwrap();
    assert_eq!(session.active_name(), Some("Sheet1"));

    let sheet2 = session.select("Sheet2");
    let summary = sheet2.summary().unwrap();
    let columns: Vec<&str> = summary.columns.iter().map(|c| c.column.as_str()).collect();
    assert_eq!(columns, vec!["visit", "value"]);
    assert_eq!(summary.get("value").unwrap().mean, 11.25);

    // Unknown names keep the current selection.
    assert_eq!(sheet2.select("Sheet9").active_name(), Some("Sheet2"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn raw_sheet_reader_keeps_spreadsheet_types() {
    let path = tmp_file("raw");
    write_two_sheet_xlsx(&path);

    let t = read_sheet_from_path(&path, "Sheet2").unwrap();
    assert_eq!(t.rows[0][1], Value::from("10"));

    let set = read_workbook_from_path(&path).unwrap();
    assert_eq!(set.len(), 2);

    let _ = std::fs::remove_file(&path);
}
