//! # dispatch-report
//!
//! Generates the requirements and design report of a city-wide emergency
//! dispatch platform as a Word document. The narrative text is fixed, while
//! the diagrams and formulas are drawn on every run into an image directory
//! and embedded into the document.
//!
//! A single broken figure or formula never aborts a run: it is replaced by
//! placeholder text or a placeholder image and the rest of the document is
//! still written.

pub mod assemble;
pub mod config;
pub mod content;
pub mod diagram;
pub mod docx;
mod error;
pub mod ir;

pub use assemble::{FormulaEntry, ReportAssembler, ReportSummary, standard_formulas};
pub use config::ReportConfig;
pub use error::*;
pub use ir::{Block, ParagraphStyle, Picture, ReportDocument};

/// The result type for dispatch-report.
pub type Result<T, Err = Error> = std::result::Result<T, Err>;
