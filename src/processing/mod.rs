//! In-memory table transformations.
//!
//! - [`normalize()`]: coerce-then-fallback column typing, applied to every freshly loaded table
//! - [`describe()`]: count/mean/std/min/percentiles/max over numeric columns
//!
//! ## Example: normalize → describe
//!
//! ```rust
//! use table_loader::processing::{describe, normalize};
//! use table_loader::types::{Schema, Table, Value};
//!
//! let raw = Table::new(
//!     Schema::utf8(["id", "score"]),
//!     vec![
//!         vec![Value::from("1"), Value::from("10.5")],
//!         vec![Value::from("2"), Value::Null],
//!         vec![Value::from("3"), Value::from("n/a")],
//!     ],
//! );
//!
//! let typed = normalize(&raw);
//! let summary = describe(&typed);
//!
//! // "score" kept its stray label, so it is not numeric and is left out.
//! assert_eq!(summary.len(), 1);
//! assert_eq!(summary.columns[0].column, "id");
//! assert_eq!(summary.columns[0].max, 3.0);
//! ```

pub mod normalize;
pub mod summary;

pub use normalize::{coerce_numeric, normalize, normalize_table_set};
pub use summary::{ColumnSummary, Summary, describe};
