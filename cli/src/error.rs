use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Pool(#[from] socker_core::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
