use thiserror::Error;

/// A structural assumption about a fetched page did not hold.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing node for {field} at {path}")]
    MissingNode { field: &'static str, path: String },

    #[error("missing attribute '{attribute}' for {field}")]
    MissingAttribute {
        field: &'static str,
        attribute: &'static str,
    },

    #[error("date '{text}' does not match {pattern}")]
    DateFormat { text: String, pattern: String },

    #[error("invalid selector: {0}")]
    InvalidSelector(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("petition {reference_num} with {signatures} signatures is already stored")]
    ConstraintViolation {
        reference_num: String,
        signatures: String,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("storage handle poisoned by an earlier panic")]
    Poisoned,
}

/// Transport-level failures. The fetcher reports these as an absent page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("detail page for petition {reference_num} could not be fetched ({url})")]
    DetailUnavailable { reference_num: String, url: String },

    #[error("failed to parse detail page for petition {reference_num}: {source}")]
    DetailParse {
        reference_num: String,
        source: ParseError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
