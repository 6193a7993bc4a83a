use thiserror::Error;

/// Structural problems with a dataset file. Bad individual rows are not
/// errors; normalization drops and counts them instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("expected a top-level JSON array of records")]
    NotARecordArray,

    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),
}
