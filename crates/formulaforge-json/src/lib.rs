//! # formulaforge-json
//!
//! Import and export of calculator definitions for formulaforge.
//!
//! - [`CalculatorReader`] parses JSON documents, fills in defaults for missing
//!   optional fields and rejects documents that are incomplete or invalid
//! - [`CalculatorWriter`] exports JSON documents (single or bulk) and the CSV
//!   and Markdown renderings

mod error;
mod markdown;
mod options;
mod reader;
mod tabular;
mod writer;

pub use error::{JsonError, JsonResult};
pub use markdown::to_markdown;
pub use options::{ExportFormat, ReadOptions, WriteOptions};
pub use reader::CalculatorReader;
pub use tabular::{to_csv, write_csv};
pub use writer::CalculatorWriter;
