use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrreryError>;

#[derive(Error, Debug)]
pub enum OrreryError {
    /// A body was described in a way that can't be simulated, e.g. a moon
    /// with nothing to orbit.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The sphere generator was asked for a shape it can't build.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("could not read system file: {0}")]
    Io(#[from] std::io::Error),
}

impl OrreryError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        OrreryError::InvalidConfiguration(message.into())
    }

    pub(crate) fn geometry(message: impl Into<String>) -> Self {
        OrreryError::InvalidGeometry(message.into())
    }
}
