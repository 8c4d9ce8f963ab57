use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "replay";
const OPTIONS_FILE: &str = "options.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default = "default_results")]
    pub results: usize,
    #[serde(default = "default_show_values")]
    pub show_values: bool,
    #[serde(default = "default_color")]
    pub color: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_results() -> usize {
    10
}

fn default_show_values() -> bool {
    true
}

fn default_color() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("MyData")
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            results: default_results(),
            show_values: default_show_values(),
            color: default_color(),
            data_dir: default_data_dir(),
        }
    }
}

pub fn config_root() -> Result<PathBuf> {
    if let Ok(override_dir) = env::var("REPLAY_CONFIG_DIR") {
        return Ok(PathBuf::from(override_dir));
    }

    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .context("neither HOME nor USERPROFILE is set")?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR))
}

pub fn options_path() -> Result<PathBuf> {
    Ok(config_root()?.join(OPTIONS_FILE))
}

pub fn ensure_config_dir() -> Result<PathBuf> {
    let root = config_root()?;
    fs::create_dir_all(&root).with_context(|| format!("failed to create {}", root.display()))?;
    Ok(root)
}

pub fn load_options() -> Result<ReportOptions> {
    let path = options_path()?;
    load_options_from_path(&path)
}

pub fn save_options(options: &ReportOptions) -> Result<()> {
    ensure_config_dir()?;
    let path = options_path()?;
    save_options_to_path(&path, options)
}

fn load_options_from_path(path: &Path) -> Result<ReportOptions> {
    if !path.exists() {
        return Ok(ReportOptions::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read options file {}", path.display()))?;
    let options: ReportOptions = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse options file {}", path.display()))?;
    Ok(options)
}

fn save_options_to_path(path: &Path, options: &ReportOptions) -> Result<()> {
    let json = serde_json::to_string_pretty(options)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
