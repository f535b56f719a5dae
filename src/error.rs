use std::path::PathBuf;

use thiserror::Error;

use crate::ingestion::TableFormat;

/// Convenience result type for load operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Convenience result type for format readers.
pub type ReadResult<T> = Result<T, ReadError>;

/// Error type returned by the public loading and session API.
///
/// None of these are fatal: a caller that gets an error keeps whatever it had loaded before.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file name does not end with a recognized suffix.
    #[error("unsupported file format: {} (expected .xlsx, .xls, .xpt, .sas7bdat or .csv)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The underlying reader failed while reading or decoding the file.
    #[error("failed to load {format} file: {source}")]
    ParseFailure {
        format: TableFormat,
        #[source]
        source: ReadError,
    },

    /// A summary was requested while no table is loaded.
    #[error("no data is loaded to summarize")]
    EmptySelection,
}

/// Failure raised by a format reader.
///
/// The dispatcher wraps these in [`LoadError::ParseFailure`].
#[derive(Debug, Error)]
pub enum ReadError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet reader error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// Delimited-text reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The sniffer found no delimiter candidate in the sample.
    #[error("could not determine delimiter")]
    UndeterminedDelimiter,

    /// The resolved delimiter cannot be used by the byte-oriented CSV reader.
    #[error("delimiter {0:?} is not a single-byte character")]
    UnsupportedDelimiter(char),

    /// A delimited row has more fields than the header.
    #[error("expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Text in a SAS file is not valid UTF-8.
    #[error("invalid utf-8 in {context}: {source}")]
    Encoding {
        context: String,
        #[source]
        source: std::str::Utf8Error,
    },

    /// The file does not follow the expected binary layout.
    #[error("malformed {format} file: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    /// The workbook contains no sheets.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// The format is known but its reader was compiled out.
    #[error("{0} loading not enabled (enable cargo feature '{0}')")]
    FeatureDisabled(&'static str),
}

impl ReadError {
    pub(crate) fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if an I/O failure is anywhere in the cause.
    pub fn is_io(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            #[cfg(feature = "excel")]
            Self::Excel(err) => matches!(err, calamine::Error::Io(_)),
            _ => false,
        }
    }
}

impl LoadError {
    pub(crate) fn parse(format: TableFormat, source: impl Into<ReadError>) -> Self {
        Self::ParseFailure {
            format,
            source: source.into(),
        }
    }
}
