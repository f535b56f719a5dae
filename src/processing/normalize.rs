//! Column type normalization.
//!
//! Every column goes through the same two passes:
//!
//! 1. **Coerce**: cast each cell to a number; cells that do not convert become [`Value::Null`].
//! 2. **Fill back**: wherever the cast produced `Null`, restore the original cell.
//!
//! The column type is then narrowed from the surviving cells. A column of numbers parsed from text
//! becomes numeric, while a column with a stray label keeps the label next to the parsed numbers:
//! `["1", "2", "abc"]` becomes `[1, 2, "abc"]`, never `[1, 2, missing]`.

use crate::types::{DataType, Field, Schema, Table, TableSet, Value};

/// Normalize every table of a freshly loaded set.
pub fn normalize_table_set(set: TableSet) -> TableSet {
    set.map_tables(|t| normalize(&t))
}

/// Normalize the column types of one table.
///
/// Row count and row order never change. The operation is idempotent.
///
/// ```
/// use table_loader::processing::normalize;
/// use table_loader::types::{DataType, Schema, Table, Value};
///
/// let raw = Table::new(
///     Schema::utf8(["n"]),
///     vec![vec![Value::from("1")], vec![Value::from("2")], vec![Value::from("abc")]],
/// );
/// let t = normalize(&raw);
/// assert_eq!(t.schema.fields[0].data_type, DataType::Utf8);
/// assert_eq!(t.rows[0][0], Value::Int64(1));
/// assert_eq!(t.rows[2][0], Value::from("abc"));
/// ```
pub fn normalize(table: &Table) -> Table {
    let width = table.column_count();
    let mut rows: Vec<Vec<Value>> = vec![Vec::with_capacity(width); table.row_count()];
    let mut fields = Vec::with_capacity(width);

    for (idx, field) in table.schema.fields.iter().enumerate() {
        let filled: Vec<Value> = table.column(idx).map(fill_missing_from).collect();
        let (data_type, cells) = narrow_column(filled);
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        fields.push(Field::new(field.name.clone(), data_type));
    }

    Table::new(Schema::new(fields), rows)
}

/// Cast one cell to a number, or [`Value::Null`] if it does not convert.
pub fn coerce_numeric(cell: &Value) -> Value {
    match cell {
        Value::Int64(v) => Value::Int64(*v),
        Value::Float64(v) if v.is_nan() => Value::Null,
        Value::Float64(v) => Value::Float64(*v),
        Value::Utf8(s) => parse_number(s.trim()),
        Value::Bool(_) | Value::Null => Value::Null,
    }
}

fn parse_number(s: &str) -> Value {
    if let Ok(i) = s.parse::<i64>() {
        return Value::Int64(i);
    }
    match s.parse::<f64>() {
        Ok(f) if !f.is_nan() => Value::Float64(f),
        _ => Value::Null,
    }
}

/// The coerced cell, or the original where coercion failed.
///
/// A NaN float stays missing: for floats NaN is already the missing marker.
fn fill_missing_from(original: &Value) -> Value {
    match (coerce_numeric(original), original) {
        (Value::Null, Value::Float64(_)) => Value::Null,
        (Value::Null, _) => original.clone(),
        (coerced, _) => coerced,
    }
}

fn whole_i64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Pick the narrowest type that holds every non-missing cell, converting cells to match.
fn narrow_column(cells: Vec<Value>) -> (DataType, Vec<Value>) {
    let mut any_numeric = false;
    let mut all_numeric = true;
    let mut all_whole = true;
    let mut all_bool = true;
    let mut any_present = false;

    for cell in &cells {
        match cell {
            Value::Null => continue,
            Value::Int64(_) => {
                any_numeric = true;
                all_bool = false;
            }
            Value::Float64(f) => {
                any_numeric = true;
                all_bool = false;
                all_whole &= whole_i64(*f).is_some();
            }
            Value::Bool(_) => all_numeric = false,
            Value::Utf8(_) => {
                all_numeric = false;
                all_bool = false;
            }
        }
        any_present = true;
    }

    if !any_present {
        return (DataType::Int64, cells);
    }

    if any_numeric && all_numeric {
        if all_whole {
            let cells = cells
                .into_iter()
                .map(|c| match c {
                    Value::Float64(f) => whole_i64(f).map_or(Value::Float64(f), Value::Int64),
                    other => other,
                })
                .collect();
            return (DataType::Int64, cells);
        }
        let cells = cells
            .into_iter()
            .map(|c| match c {
                Value::Int64(i) => Value::Float64(i as f64),
                other => other,
            })
            .collect();
        return (DataType::Float64, cells);
    }

    if all_bool {
        return (DataType::Bool, cells);
    }

    (DataType::Utf8, cells)
}
