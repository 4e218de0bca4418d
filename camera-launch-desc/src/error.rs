use std::path::PathBuf;

use camera_launch_ament::AmentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Ament(#[from] AmentError),

    #[error("executable '{executable}' not found in package '{package}' (looked at '{}')", path.display())]
    ExecutableNotFound {
        package: String,
        executable: String,
        path: PathBuf,
    },

    #[error("failed to serialize launch record")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ParamFileError {
    #[error("malformed parameter file '{}'", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("parameter file '{}' must be a mapping of node names", path.display())]
    NotAMapping { path: PathBuf },
}
