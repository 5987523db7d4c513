//! IP risk reports
//!
//! Combines metadata lookup and risk scoring into a report, and renders it
//! as HTML, plain text or JSON.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod render;
pub mod report;

pub use render::{escape_html, render, render_error, ReportFormat};
pub use report::RiskReport;
