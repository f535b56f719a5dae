//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which reads a file into a normalized
//! [`crate::types::TableSet`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file name suffix.
//! - If a [`super::observability::LoadObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{LoadError, LoadResult, ReadResult};
use crate::processing::normalize_table_set;
use crate::types::TableSet;

use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats};
use super::{csv, sas7bdat, xport};

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableFormat {
    /// Spreadsheet workbooks (`.xlsx`, `.xls`); feature-gated behind `excel`.
    Excel,
    /// SAS transport (XPORT v5) files.
    Xport,
    /// SAS binary datasets.
    Sas7bdat,
    /// Delimited text with a sniffed delimiter.
    Csv,
}

impl TableFormat {
    const SUFFIXES: [(&'static str, Self); 5] = [
        (".xlsx", Self::Excel),
        (".xls", Self::Excel),
        (".xpt", Self::Xport),
        (".sas7bdat", Self::Sas7bdat),
        (".csv", Self::Csv),
    ];

    /// Infer the format from a file name suffix.
    ///
    /// Matching is case-sensitive: `data.CSV` is not recognized.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Self::SUFFIXES
            .iter()
            .find(|(suffix, _)| name.ends_with(suffix))
            .map(|(_, format)| *format)
    }

    /// Whether this format always produces a single table under
    /// [`crate::types::SINGLE_TABLE_KEY`].
    pub fn is_single_table(self) -> bool {
        !matches!(self, Self::Excel)
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excel => "spreadsheet",
            Self::Xport => "SAS transport",
            Self::Sas7bdat => "SAS7BDAT",
            Self::Csv => "delimited text",
        })
    }
}

/// Options controlling unified loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file name suffix.
    pub format: Option<TableFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn LoadObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: LoadSeverity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

/// Load a file into a normalized [`TableSet`].
///
/// - Spreadsheets produce one table per sheet, in workbook order.
/// - Delimited text and SAS files produce one table under `"File"`.
/// - Every table is passed through [`crate::processing::normalize`].
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with the name and shape of every table
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use table_loader::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), table_loader::LoadError> {
/// let tables = load_from_path("measurements.csv", &LoadOptions::default())?;
/// for (name, table) in tables.iter() {
///     println!("{name}: {} rows", table.row_count());
/// }
/// # Ok(())
/// # }
/// ```
///
/// Force a format when the file name carries no usable suffix:
///
/// ```no_run
/// use table_loader::ingestion::{load_from_path, LoadOptions, TableFormat};
///
/// # fn main() -> Result<(), table_loader::LoadError> {
/// let opts = LoadOptions {
///     format: Some(TableFormat::Xport),
///     ..Default::default()
/// };
/// let tables = load_from_path("export.dat", &opts)?;
/// println!("rows={}", tables.total_rows());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<TableSet> {
    let path = path.as_ref();
    let format = match options.format {
        Some(f) => f,
        None => TableFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?,
    };

    let ctx = LoadContext {
        path: path.to_path_buf(),
        format,
    };

    let result = read_format(path, format)
        .map(normalize_table_set)
        .map_err(|e| LoadError::parse(format, e));

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(set) => obs.on_success(&ctx, &LoadStats::from_table_set(set)),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn read_format(path: &Path, format: TableFormat) -> ReadResult<TableSet> {
    match format {
        TableFormat::Excel => read_excel_dispatch(path),
        TableFormat::Xport => xport::read_xport_from_path(path).map(TableSet::single),
        TableFormat::Sas7bdat => sas7bdat::read_sas7bdat_from_path(path).map(TableSet::single),
        TableFormat::Csv => csv::read_csv_from_path(path).map(TableSet::single),
    }
}

pub(crate) fn severity_for_error(e: &LoadError) -> LoadSeverity {
    match e {
        LoadError::ParseFailure { source, .. } if source.is_io() => LoadSeverity::Critical,
        LoadError::ParseFailure { .. } => LoadSeverity::Error,
        LoadError::UnsupportedFormat { .. } => LoadSeverity::Error,
        LoadError::EmptySelection => LoadSeverity::Warning,
    }
}

fn read_excel_dispatch(path: &Path) -> ReadResult<TableSet> {
    // Avoid unused warnings when the feature is off.
    let _ = path;

    #[cfg(feature = "excel")]
    {
        super::excel::read_workbook_from_path(path)
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(crate::error::ReadError::FeatureDisabled("excel"))
    }
}

/// Owned load request, for callers that queue load work.
#[derive(Clone)]
pub struct LoadRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling the load.
    pub options: LoadOptions,
}

impl fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl LoadRequest {
    /// Create a request with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: LoadOptions::default(),
        }
    }

    /// Execute the request by calling [`load_from_path`].
    pub fn run(&self) -> LoadResult<TableSet> {
        load_from_path(&self.path, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReadError;

    #[test]
    fn suffix_matching_is_case_sensitive() {
        assert_eq!(TableFormat::from_path(Path::new("a/b.csv")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("b.CSV")), None);
        assert_eq!(TableFormat::from_path(Path::new("b.xls")), Some(TableFormat::Excel));
        assert_eq!(TableFormat::from_path(Path::new("b.xlsx")), Some(TableFormat::Excel));
        assert_eq!(TableFormat::from_path(Path::new("b.xpt")), Some(TableFormat::Xport));
        assert_eq!(
            TableFormat::from_path(Path::new("b.sas7bdat")),
            Some(TableFormat::Sas7bdat)
        );
        assert_eq!(TableFormat::from_path(Path::new("b.json")), None);
        assert_eq!(TableFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn io_failures_are_critical() {
        let io = LoadError::parse(
            TableFormat::Csv,
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(severity_for_error(&io), LoadSeverity::Critical);

        let parse = LoadError::parse(TableFormat::Csv, ReadError::UndeterminedDelimiter);
        assert_eq!(severity_for_error(&parse), LoadSeverity::Error);
    }
}
