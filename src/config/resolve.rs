use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const CONFIG_DIR: &str = ".coursegraph";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory relative catalog paths are resolved against.
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub settings: Settings,
}

/// Finds and loads the configuration. An explicit path (argument, then
/// `COURSEGRAPH_CONFIG`) must exist; otherwise the nearest
/// `.coursegraph/config.toml` above `start` is used, and without one the
/// defaults apply. Environment overrides are applied last.
pub fn resolve_config(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<ResolvedConfig, ConfigError> {
    let explicit = config_path.or_else(|| env::var("COURSEGRAPH_CONFIG").ok().map(PathBuf::from));
    let mut resolved = match explicit {
        Some(path) => resolve_with_config(path)?,
        None => find_config_from(start.as_ref())?,
    };
    apply_overrides(&mut resolved.settings, |key| env::var(key).ok());
    Ok(resolved)
}

pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

pub fn apply_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(paths) = lookup("COURSEGRAPH_CATALOG") {
        settings.catalog.sources = env::split_paths(&paths)
            .map(|path| path.to_string_lossy().to_string())
            .filter(|path| !path.is_empty())
            .collect();
    }
    if let Some(url) = lookup("COURSEGRAPH_CATALOG_URL") {
        settings.catalog.url = Some(url);
    }
    if let Some(track) = lookup("COURSEGRAPH_TRACK") {
        settings.view.specialization = Some(track);
    }
}

fn resolve_with_config(config_path: PathBuf) -> Result<ResolvedConfig, ConfigError> {
    let settings = load_settings(&config_path)?;
    let root = infer_root_from_config(&config_path).unwrap_or_else(|| PathBuf::from("."));
    Ok(ResolvedConfig {
        root,
        config_path: Some(config_path),
        settings,
    })
}

fn infer_root_from_config(config_path: &Path) -> Option<PathBuf> {
    let parent = config_path.parent()?;
    if parent.file_name()? == CONFIG_DIR {
        return parent.parent().map(|p| p.to_path_buf());
    }

    Some(parent.to_path_buf())
}

fn find_config_from(start: &Path) -> Result<ResolvedConfig, ConfigError> {
    for ancestor in start.ancestors() {
        let config_path = ancestor.join(CONFIG_DIR).join(CONFIG_FILE);
        if config_path.is_file() {
            let settings = load_settings(&config_path)?;
            return Ok(ResolvedConfig {
                root: ancestor.to_path_buf(),
                config_path: Some(config_path),
                settings,
            });
        }
    }

    Ok(ResolvedConfig {
        root: start.to_path_buf(),
        config_path: None,
        settings: Settings::default(),
    })
}
