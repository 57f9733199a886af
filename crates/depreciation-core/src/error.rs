use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepreciationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing purchase date for item {item_no}.")]
    MissingPurchaseDate { item_no: String },

    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for DepreciationError {
    fn from(e: csv::Error) -> Self {
        DepreciationError::Csv(e.to_string())
    }
}
