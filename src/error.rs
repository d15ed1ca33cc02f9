use thiserror::Error;

use crate::config::ConfigError;
use crate::core::source::CatalogError;

#[derive(Debug, Error)]
pub enum CourseGraphError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CourseGraphError>;
