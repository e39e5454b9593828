use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV writer: {0}")]
    Flush(String),
    #[error("CSV report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
