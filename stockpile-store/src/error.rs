use std::path::PathBuf;

/// Errors raised by the flat-file persistence layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog {} is missing required column `{column}`", .path.display())]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
