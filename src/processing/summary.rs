//! Descriptive statistics over the numeric columns of a table.

use std::fmt;

use serde::Serialize;

use crate::types::Table;

/// Statistics for one numeric column. Statistics that are undefined for the column (the mean of
/// no values, the standard deviation of one value) are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Number of non-missing cells.
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    /// 25th percentile, linearly interpolated.
    pub p25: f64,
    /// Median.
    pub p50: f64,
    /// 75th percentile, linearly interpolated.
    pub p75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn from_values(column: &str, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let mean = if n == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / n as f64
        };
        let std = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Self {
            column: column.to_owned(),
            count: n,
            mean,
            std,
            min: values.first().copied().unwrap_or(f64::NAN),
            p25: percentile(&values, 0.25),
            p50: percentile(&values, 0.5),
            p75: percentile(&values, 0.75),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }

    fn cells(&self) -> [String; 8] {
        [
            self.count.to_string(),
            fmt_stat(self.mean),
            fmt_stat(self.std),
            fmt_stat(self.min),
            fmt_stat(self.p25),
            fmt_stat(self.p50),
            fmt_stat(self.p75),
            fmt_stat(self.max),
        ]
    }
}

/// Linear interpolation between the closest ranks of sorted `values`.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

fn fmt_stat(v: f64) -> String {
    format!("{v:.6}")
}

/// Per-column statistics of a table, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

impl Summary {
    /// Look up the statistics of one column.
    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

const HEADERS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "no numeric columns to summarize");
        }

        let cells: Vec<[String; 8]> = self.columns.iter().map(ColumnSummary::cells).collect();
        let name_width = self
            .columns
            .iter()
            .map(|c| c.column.chars().count())
            .max()
            .unwrap_or(0);
        let widths: [usize; 8] = std::array::from_fn(|i| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain([HEADERS[i].len()])
                .max()
                .unwrap_or(0)
        });

        write!(f, "{:name_width$}", "")?;
        for (h, w) in HEADERS.iter().zip(widths) {
            write!(f, "  {h:>w$}")?;
        }
        writeln!(f)?;

        for (col, row) in self.columns.iter().zip(&cells) {
            write!(f, "{:<name_width$}", col.column)?;
            for (v, w) in row.iter().zip(widths) {
                write!(f, "  {v:>w$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Summarize the numeric (`Int64`/`Float64`) columns of `table`. Other columns are omitted.
///
/// ```
/// use table_loader::processing::describe;
/// use table_loader::types::{DataType, Field, Schema, Table, Value};
///
/// let t = Table::new(
///     Schema::new(vec![Field::new("x", DataType::Int64)]),
///     vec![vec![Value::Int64(1)], vec![Value::Int64(2)], vec![Value::Int64(3)]],
/// );
/// let s = describe(&t);
/// assert_eq!(s.columns[0].count, 3);
/// assert_eq!(s.columns[0].mean, 2.0);
/// assert_eq!(s.columns[0].p50, 2.0);
/// ```
pub fn describe(table: &Table) -> Summary {
    let columns = table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.data_type.is_numeric())
        .map(|(idx, field)| {
            let values = table.column(idx).filter_map(|v| v.as_f64()).collect();
            ColumnSummary::from_values(&field.name, values)
        })
        .collect();
    Summary { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table() -> Table {
        Table::new(
            Schema::new(vec![
                Field::new("id", DataType::Int64),
                Field::new("name", DataType::Utf8),
                Field::new("score", DataType::Float64),
            ]),
            vec![
                vec![Value::Int64(1), Value::from("a"), Value::Float64(1.0)],
                vec![Value::Int64(2), Value::from("b"), Value::Null],
                vec![Value::Int64(3), Value::from("c"), Value::Float64(4.0)],
                vec![Value::Int64(4), Value::from("d"), Value::Float64(2.0)],
            ],
        )
    }

    #[test]
    fn describes_numeric_columns_only() {
        let s = describe(&table());
        let names: Vec<&str> = s.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["id", "score"]);
    }

    #[test]
    fn statistics_match_sample_definitions() {
        let s = describe(&table());
        let id = s.get("id").unwrap();
        assert_eq!(id.count, 4);
        assert!(approx(id.mean, 2.5));
        assert!(approx(id.std, 1.2909944487358056));
        assert!(approx(id.p25, 1.75));
        assert!(approx(id.p50, 2.5));
        assert!(approx(id.p75, 3.25));
        assert_eq!((id.min, id.max), (1.0, 4.0));

        let score = s.get("score").unwrap();
        assert_eq!(score.count, 3);
        assert!(approx(score.mean, 7.0 / 3.0));
        assert!(approx(score.p50, 2.0));
    }

    #[test]
    fn undefined_statistics_are_nan() {
        let t = Table::new(
            Schema::new(vec![Field::new("x", DataType::Int64)]),
            vec![vec![Value::Null], vec![Value::Int64(5)]],
        );
        let x = describe(&t).columns.remove(0);
        assert_eq!(x.count, 1);
        assert_eq!(x.mean, 5.0);
        assert!(x.std.is_nan());

        let empty = Table::new(Schema::new(vec![Field::new("x", DataType::Int64)]), vec![]);
        let x = describe(&empty).columns.remove(0);
        assert_eq!(x.count, 0);
        assert!(x.mean.is_nan() && x.min.is_nan() && x.p50.is_nan());
    }

    #[test]
    fn display_renders_one_row_per_column() {
        let text = describe(&table()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("count") && lines[0].contains("75%"));
        assert!(lines[1].starts_with("id"));
        assert!(lines[1].contains("2.500000"));
        assert!(lines[2].starts_with("score"));
    }

    #[test]
    fn display_of_nan_and_empty_summary() {
        assert_eq!(fmt_stat(f64::NAN), "NaN");
        assert_eq!(
            Summary::default().to_string(),
            "no numeric columns to summarize\n"
        );
    }
}
