use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },
    #[error("no units left after filtering")]
    EmptyResult,
    #[error("current period target must be between 1 and 12, got {0}")]
    InvalidTarget(u32),
    #[error("unsupported input file {}: expected .csv or an Excel/ODS workbook", .0.display())]
    UnsupportedInput(PathBuf),
    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Workbook(#[from] calamine::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Empty results are reported as a warning rather than a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, ReportError::EmptyResult)
    }
}
