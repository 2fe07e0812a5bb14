use std::result;

pub type Result<T, E = Error> = result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid alias-table weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("couldn't build {0}")]
    Build(String),
}

impl Error {
    pub fn configuration(msg: impl ToString) -> Self {
        Error::Configuration(msg.to_string())
    }

    pub fn build(msg: impl ToString) -> Self {
        Error::Build(msg.to_string())
    }
}
