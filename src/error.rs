use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: none of the columns [{aliases}] found in header, record {line} is not empty")]
    MissingColumn {
        path: PathBuf,
        aliases: String,
        line: u64,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to connect to phrase store {path}: {source}")]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("phrase store query failed: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("failed to release phrase store connection: {0}")]
    Disconnect(#[source] rusqlite::Error),
}
