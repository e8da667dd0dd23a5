use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
