//! # zakati-report
//!
//! Turns a [`ZakatResult`](zakati_core::ZakatResult) into the summary lines
//! shown on screen and a downloadable single-page PDF.
//!
//! Rendering is pure: [`render_pdf`] returns bytes and [`write_pdf`] writes
//! them to any `std::io::Write` sink the caller chooses.

pub mod error;
pub mod pdf;
pub mod summary;

pub use error::ReportError;
pub use pdf::{render_pdf, write_pdf, ReportArtifact, REPORT_FILE_NAME, REPORT_MIME_TYPE};
pub use summary::{summary_lines, SummaryLine, REPORT_TITLE};
