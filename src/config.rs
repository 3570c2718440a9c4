//! Build configuration read from a Kconfig `.config`-style file and the environment.
//!
//! Only two keys matter to the packer:
//!
//! - `CONFIG_ROMDISK_EXTRA_FILES`: whitespace-separated sources appended after
//!   the command-line ones.
//! - `CONFIG_ROMDISK_IGNORE_HIDDEN`: `y` to skip dot-files when a directory is expanded.
//!
//! Extra sources can also be given through the `EXTRA_ROMDISK_FILES` environment variable.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PackError;

pub const EXTRA_FILES_KEY: &str = "CONFIG_ROMDISK_EXTRA_FILES";
pub const IGNORE_HIDDEN_KEY: &str = "CONFIG_ROMDISK_IGNORE_HIDDEN";
pub const EXTRA_FILES_ENV: &str = "EXTRA_ROMDISK_FILES";
pub const ZOS_PATH_ENV: &str = "ZOS_PATH";
pub const DEFAULT_CONFIG_NAME: &str = "os.conf";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomdiskConfig {
    pub extra_files: Vec<PathBuf>,
    pub ignore_hidden: bool,
}

impl RomdiskConfig {
    /// Reads `path`. A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, PackError> {
        let config_err = |e| PackError::Config { path: path.to_path_buf(), source: e };
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found!", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(config_err(e)),
        };
        debug!(config = %path.display(), "loading config file");

        let mut pairs = Vec::new();
        for item in iter {
            pairs.push(item.map_err(config_err)?);
        }
        Ok(Self::from_pairs(pairs))
    }

    /// Builds a configuration from already parsed `KEY=value` pairs; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                EXTRA_FILES_KEY => config.extra_files = split_paths(value.as_ref()),
                IGNORE_HIDDEN_KEY => config.ignore_hidden = value.as_ref() == "y",
                _ => {}
            }
        }
        config
    }
}

/// `$ZOS_PATH/os.conf`, or `./os.conf` when `ZOS_PATH` is unset.
pub fn default_config_path() -> PathBuf {
    let base = std::env::var_os(ZOS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(DEFAULT_CONFIG_NAME)
}

/// Sources listed in `EXTRA_ROMDISK_FILES`.
pub fn env_extra_files() -> Vec<PathBuf> {
    std::env::var(EXTRA_FILES_ENV)
        .map(|v| split_paths(&v))
        .unwrap_or_default()
}

fn split_paths(value: &str) -> Vec<PathBuf> {
    value.split_whitespace().map(PathBuf::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_pairs_reads_known_keys() {
        let config = RomdiskConfig::from_pairs([
            ("CONFIG_TARGET", "zeal8bit"),
            (EXTRA_FILES_KEY, "init.bin  /opt/rom/shell.bin"),
            (IGNORE_HIDDEN_KEY, "y"),
        ]);
        assert_eq!(
            config.extra_files,
            vec![PathBuf::from("init.bin"), PathBuf::from("/opt/rom/shell.bin")]
        );
        assert!(config.ignore_hidden);
    }

    #[test]
    fn test_load_kconfig_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("os.conf");
        fs::write(
            &path,
            "#\n# Automatically generated file; DO NOT EDIT.\n#\nCONFIG_ROMDISK_EXTRA_FILES=\"a.txt b.txt\"\n# CONFIG_FOO is not set\nCONFIG_ROMDISK_IGNORE_HIDDEN=n\n",
        )?;
        let config = RomdiskConfig::load(&path)?;
        assert_eq!(config.extra_files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert!(!config.ignore_hidden);
        Ok(())
    }

    #[test]
    fn test_missing_config_is_default() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = RomdiskConfig::load(&dir.path().join("absent.conf"))?;
        assert_eq!(config, RomdiskConfig::default());
        Ok(())
    }
}
