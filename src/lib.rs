//! `table-loader` reads tabular files into named, typed in-memory tables and summarizes them.
//!
//! The primary entrypoint is [`ingestion::load_from_path`], which picks a reader from the file
//! name suffix, reads one or more tables, and normalizes their column types. [`Session`] wraps it
//! in an immutable snapshot with a table selection and a statistics summary.
//!
//! ## What you can load
//!
//! **File formats (detected by suffix, case-sensitive):**
//!
//! - **Spreadsheets** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`; one
//!   table per sheet, keyed by sheet name
//! - **SAS transport** (XPORT v5): `.xpt`
//! - **SAS datasets**: `.sas7bdat`, including RLE- and RDC-compressed files
//! - **Delimited text**: `.csv`, with the delimiter sniffed from the first line (a sniffed space
//!   is read as `$`)
//!
//! Single-table formats are stored under the key [`types::SINGLE_TABLE_KEY`] (`"File"`).
//!
//! **Value types:**
//!
//! Cells are [`types::Value`]s: [`types::Value::Null`] (missing), `Int64`, `Float64`, `Bool` or
//! `Utf8`. After loading, every column is normalized (see [`processing::normalize`]): numbers
//! written as text become numbers, and cells that are not numbers keep their original value.
//!
//! ## Quick example
//!
//! ```no_run
//! use table_loader::ingestion::LoadOptions;
//! use table_loader::Session;
//!
//! # fn main() -> Result<(), table_loader::LoadError> {
//! let session = Session::new().load("trial.sas7bdat", &LoadOptions::default())?;
//! if let Some(table) = session.active_table() {
//!     println!("rows={}", table.row_count());
//! }
//! println!("{}", session.summary()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: the format dispatcher, format readers, delimiter sniffer and load observers
//! - [`processing`]: the type normalizer and the statistics summary
//! - [`session`]: the immutable load/selection snapshot
//! - [`types`]: table, schema and cell types
//! - [`error`]: error types

pub mod error;
pub mod ingestion;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{LoadError, LoadResult, ReadError};
pub use session::Session;
