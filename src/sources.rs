//! Resolves the final, ordered list of files to pack.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::RomdiskConfig;
use crate::error::PackError;

/// Where the candidate paths came from, in packing order.
#[derive(Debug, Clone, Default)]
pub struct SourceList {
    pub command_line: Vec<PathBuf>,
    pub config: Vec<PathBuf>,
    pub environment: Vec<PathBuf>,
}

/// Flattens `list` into the files to pack.
///
/// Directories are expanded one level deep: their regular files are added in
/// file-name order, subdirectories are skipped. Any other path is kept as-is so a
/// missing source is reported when its metadata is read.
pub fn collect_sources(
    list: &SourceList,
    config: &RomdiskConfig,
) -> Result<Vec<PathBuf>, PackError> {
    debug!(paths = ?list.command_line, "arguments");
    debug!(paths = ?list.config, "config");
    debug!(paths = ?list.environment, "environment");

    let mut files = Vec::new();
    for path in list.command_line.iter().chain(&list.config).chain(&list.environment) {
        if path.is_dir() {
            expand_dir(path, config.ignore_hidden, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }

    if files.is_empty() {
        return Err(PackError::NoSources);
    }
    Ok(files)
}

fn expand_dir(dir: &Path, ignore_hidden: bool, files: &mut Vec<PathBuf>) -> Result<(), PackError> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| PackError::SourceMetadata {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if ignore_hidden && is_hidden(entry.path()) {
            warn!("Skipping hidden file: {}", entry.path().display());
            continue;
        }
        if entry.path().is_file() {
            files.push(entry.into_path());
        } else {
            warn!("Skipping directory: {}", entry.path().display());
        }
    }
    Ok(())
}

/// Dot-files are hidden.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
