use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = AmentError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AmentError {
    #[error("$AMENT_PREFIX_PATH is not set. Did you source the workspace setup script?")]
    PrefixPathUnset,

    #[error("invalid package name '{0}'")]
    InvalidPackageName(String),

    #[error("package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),

    #[error("resource '{name}' of type '{resource_type}' not found")]
    ResourceNotFound { resource_type: String, name: String },

    #[error("unable to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
