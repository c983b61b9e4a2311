use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be read as a table at all.
    #[error("unreadable input: {0}")]
    Format(String),

    /// Canonical fields still absent after header mapping.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Format(format!("invalid CSV data: {err}"))
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Format(format!("invalid workbook: {err}"))
    }
}
