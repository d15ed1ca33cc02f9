use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::catalog::Catalog;
use crate::core::course::Course;

const SAMPLE_CATALOG: &str = include_str!("sample_catalog.json");

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog at {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse catalog at {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid catalog pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("catalog pattern matched no files: {0}")]
    NoMatches(String),
    #[error("failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("embedded sample catalog is invalid: {0}")]
    Sample(#[source] serde_json::Error),
}

/// What to show when the configured catalog cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fallback {
    #[default]
    Sample,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Glob patterns, resolved against `base` when relative.
    Files { base: PathBuf, patterns: Vec<String> },
    Url { url: String, timeout: Duration },
    Sample,
    Empty,
}

#[derive(Debug)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    /// Set when the requested source failed and the fallback was used.
    pub degraded: Option<CatalogError>,
}

pub fn load_catalog(source: &CatalogSource) -> Result<Catalog, CatalogError> {
    match source {
        CatalogSource::Files { base, patterns } => load_files(base, patterns),
        CatalogSource::Url { url, timeout } => fetch_catalog(url, *timeout),
        CatalogSource::Sample => sample_catalog(),
        CatalogSource::Empty => Ok(Catalog::empty()),
    }
}

pub fn load_with_fallback(source: &CatalogSource, fallback: Fallback) -> LoadedCatalog {
    match load_catalog(source) {
        Ok(catalog) => LoadedCatalog {
            catalog,
            degraded: None,
        },
        Err(err) => {
            warn!(error = %err, ?fallback, "catalog unavailable, using fallback");
            let catalog = match fallback {
                Fallback::Sample => sample_catalog().unwrap_or_default(),
                Fallback::Empty => Catalog::empty(),
            };
            LoadedCatalog {
                catalog,
                degraded: Some(err),
            }
        }
    }
}

pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    let courses: Vec<Course> =
        serde_json::from_str(SAMPLE_CATALOG).map_err(CatalogError::Sample)?;
    Ok(Catalog::new(courses))
}

pub fn parse_catalog_document(path: &Path, contents: &str) -> Result<Vec<Course>, CatalogError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("json") => serde_json::from_str(contents).map_err(|source| CatalogError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(contents).map_err(|source| CatalogError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn load_files(base: &Path, patterns: &[String]) -> Result<Catalog, CatalogError> {
    let mut catalog = Catalog::empty();
    for pattern in patterns {
        for path in expand_pattern(base, pattern)? {
            let contents = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
                path: path.clone(),
                source,
            })?;
            let courses = parse_catalog_document(&path, &contents)?;
            debug!(path = %path.display(), courses = courses.len(), "loaded catalog file");
            catalog.extend(courses);
        }
    }
    Ok(catalog)
}

fn expand_pattern(base: &Path, pattern: &str) -> Result<Vec<PathBuf>, CatalogError> {
    let full = if Path::new(pattern).is_absolute() {
        PathBuf::from(pattern)
    } else {
        base.join(pattern)
    };
    let full = full.to_string_lossy().to_string();
    let entries = glob::glob(&full).map_err(|source| CatalogError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| CatalogError::Io {
            path: err.path().to_path_buf(),
            source: err.into_error(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(CatalogError::NoMatches(full));
    }
    paths.sort();
    Ok(paths)
}

fn fetch_catalog(url: &str, timeout: Duration) -> Result<Catalog, CatalogError> {
    let fetch_error = |source| CatalogError::Fetch {
        url: url.to_string(),
        source,
    };
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_error)?;
    let courses: Vec<Course> = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(fetch_error)?;
    debug!(url, courses = courses.len(), "fetched catalog");
    Ok(Catalog::new(courses))
}
