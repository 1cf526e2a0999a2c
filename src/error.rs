use std::path::PathBuf;

use crate::render::TemplateError;

/// Failures that stop the app before the terminal is touched
#[derive(thiserror::Error, Debug)]
pub enum StartupError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("dataset is not a JSON object of species records: {0}")]
    Dataset(#[from] serde_json::Error),
    #[error("card template: {0}")]
    Template(#[from] TemplateError),
}
