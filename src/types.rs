//! Core data model types.
//!
//! Every loader produces [`Table`]s: a [`Schema`] (a list of typed [`Field`]s) plus row-major
//! cells of type [`Value`]. One load produces a [`TableSet`], an insertion-ordered collection of
//! named tables.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Logical data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string. Also the type of mixed columns whose cells kept different variants.
    Utf8,
}

impl DataType {
    /// Returns `true` for the types included in a statistics summary.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Create a schema of [`DataType::Utf8`] fields, the shape loaders use before normalization.
    pub fn utf8<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            names
                .into_iter()
                .map(|n| Field::new(n, DataType::Utf8))
                .collect(),
        )
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing marker: no usable value here. Distinct from zero and from empty text.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float. Readers and the normalizer turn NaN into [`Value::Null`].
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for the missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell, if it is an integer or a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Utf8(s.to_owned())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<NA>"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

static NULL_CELL: Value = Value::Null;

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Iterate the cells of column `idx` top to bottom.
    ///
    /// Rows shorter than the schema yield [`Value::Null`] for the missing cells.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(idx).unwrap_or(&NULL_CELL))
    }

    /// Look up column cells by name.
    pub fn column_by_name(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        self.schema.index_of(name).map(|idx| self.column(idx))
    }
}

/// Name under which single-table formats (delimited text, SAS files) are stored.
pub const SINGLE_TABLE_KEY: &str = "File";

/// Insertion-ordered mapping from table name to [`Table`].
///
/// Names are unique; inserting an existing name replaces the table in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableSet {
    entries: Vec<(String, Table)>,
}

impl TableSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding one table under [`SINGLE_TABLE_KEY`].
    pub fn single(table: Table) -> Self {
        let mut set = Self::new();
        set.insert(SINGLE_TABLE_KEY, table);
        set
    }

    /// Insert a table, keeping the original position if `name` already exists.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = table,
            None => self.entries.push((name, table)),
        }
    }

    /// Look up a table by name.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Returns `true` if a table named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Table names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// The first table name, which is the default selection after a load.
    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|(n, _)| n.as_str())
    }

    /// Iterate `(name, table)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total row count across all tables.
    pub fn total_rows(&self) -> usize {
        self.entries.iter().map(|(_, t)| t.row_count()).sum()
    }

    /// Apply `f` to every table, preserving names and order.
    pub fn map_tables<F>(self, mut f: F) -> Self
    where
        F: FnMut(Table) -> Table,
    {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(n, t)| (n, f(t)))
                .collect(),
        }
    }
}

impl Serialize for TableSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, table) in &self.entries {
            map.serialize_entry(name, table)?;
        }
        map.end()
    }
}
