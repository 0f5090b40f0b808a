use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaceFinderError {
    #[error("Catalog error: {0}")]
    CatalogError(#[from] crate::catalog::CatalogError),
    #[error("Search error: {0}")]
    SearchError(#[from] crate::search::SearchError),
    #[error("Prompt error: {0}")]
    PromptError(#[from] crate::prompt::PromptError),
    #[error("Data error: {0}")]
    DataError(#[from] placefinder_data::DataError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PlaceFinderError>;
