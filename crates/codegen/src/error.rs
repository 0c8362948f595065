use std::path::PathBuf;

/// Error type for code generation operations.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Reading the config file or writing generated output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has fields of the wrong type.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The document cannot be rendered for the chosen target.
    #[error("emit error: {0}")]
    Emit(String),
}
