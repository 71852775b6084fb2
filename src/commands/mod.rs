pub mod clean;
pub mod export;
pub mod import;
pub mod ingest;
pub mod status;
