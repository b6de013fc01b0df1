use std::{
    fs::{create_dir_all, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use certmint::{DEFAULT_EXPIRY_YEARS, DEFAULT_KEY_LENGTH};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    pub ca: CaConfig,
    #[serde(default)]
    pub issue: IssueConfig,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CaConfig {
    /// Directory holding `ca_cert.pem` and `ca_cert.key`.
    pub default_ca_path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct IssueConfig {
    pub key_length: usize,
    pub expiry_years: u32,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            key_length: DEFAULT_KEY_LENGTH,
            expiry_years: DEFAULT_EXPIRY_YEARS,
        }
    }
}

pub fn create_default_config(dirs: &ProjectDirs) -> Config {
    Config {
        ca: CaConfig {
            default_ca_path: dirs.data_dir().join("ca"),
        },
        issue: IssueConfig::default(),
    }
}

/// Read `user_config_path` if given, otherwise the platform config file,
/// which is written with defaults on first run.
pub fn read_config(app: &ProjectDirs, user_config_path: Option<&Path>) -> anyhow::Result<Config> {
    match user_config_path {
        Some(path) if path.exists() => load_config(path),
        Some(path) => bail!("can't find file {path:?}"),
        None => load_or_create_config(
            &app.config_dir().join("config.toml"),
            || create_default_config(app),
        ),
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut str = String::new();
    File::open(path)
        .with_context(|| format!("can't open {path:?}"))?
        .read_to_string(&mut str)
        .with_context(|| format!("Can't read {path:?}"))?;
    toml::from_str::<Config>(&str).with_context(|| format!("Can't parse file {path:?}"))
}

fn load_or_create_config(
    config_path: &Path,
    default: impl FnOnce() -> Config,
) -> anyhow::Result<Config> {
    if config_path.exists() {
        return load_config(config_path);
    }
    let config = default();
    if let Some(dir) = config_path.parent() {
        create_dir_all(dir).context("Can't create config dir")?;
    }
    File::create(config_path)
        .with_context(|| format!("Can't create file {config_path:?}"))?
        .write_all(toml::to_string_pretty(&config)?.as_bytes())
        .with_context(|| format!("Can't write file {config_path:?}"))?;
    tracing::info!(path = ?config_path, "wrote default config");
    Ok(config)
}
