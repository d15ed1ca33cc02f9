use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::core::source::{CatalogSource, Fallback, DEFAULT_FETCH_TIMEOUT};
use crate::graph::ViewSelection;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub view: ViewSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub fallback: Fallback,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub dedupe_by_title: Option<bool>,
}

impl CatalogSettings {
    /// A URL wins over local files; with neither, the embedded sample is used.
    pub fn source(&self, base: &Path) -> CatalogSource {
        if let Some(url) = self.url.as_ref().filter(|url| !url.trim().is_empty()) {
            let timeout = self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_FETCH_TIMEOUT);
            return CatalogSource::Url {
                url: url.clone(),
                timeout,
            };
        }
        if self.sources.is_empty() {
            return CatalogSource::Sample;
        }
        CatalogSource::Files {
            base: base.to_path_buf(),
            patterns: self.sources.clone(),
        }
    }
}

impl ViewSettings {
    pub fn selection(&self) -> ViewSelection {
        ViewSelection::from_option(self.specialization.clone())
    }
}

pub fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
