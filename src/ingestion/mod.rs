//! Loading entrypoints and format readers.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - infers the format from the file name suffix (or you can force one via [`LoadOptions`])
//! - reads the file into a [`crate::types::TableSet`] and normalizes every table
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! Format-specific readers are also available under:
//! - [`csv`] (with the delimiter heuristic in [`sniffer`])
//! - `excel` (Cargo feature `excel`, on by default)
//! - [`xport`]
//! - [`sas7bdat`]
//!
//! Readers return raw tables; normalization happens in the dispatcher.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod sas7bdat;
pub mod sniffer;
pub mod unified;
pub mod xport;

mod headers;

pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats,
    LogObserver, TableStats,
};
pub use unified::{LoadOptions, LoadRequest, TableFormat, load_from_path};
