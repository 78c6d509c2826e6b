//! Input path → ordered list of files to play.
//!
//! A directory contributes every entry whose name contains `"mp3"`. This is a
//! substring match, not an extension check: `notmp3.txt` matches too, and so
//! does a subdirectory called `mp3s`. Such entries fail later at decoder open.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{PlayerError, Result};

/// Substring a directory entry's name must contain to be collected.
pub const NAME_FILTER: &str = "mp3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
    pub kind: InputKind,
    pub paths: Vec<PathBuf>,
    /// Set when matches were dropped because the capacity was reached.
    pub truncated: bool,
}

/// Warning logged when directory matches are dropped at the capacity limit.
pub const TRUNCATION_WARNING: &str = "too many MP3 files, some files will not be played";

/// Strip the line terminator left by interactive input.
pub fn trim_input(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n")
        .map(|s| s.strip_suffix(b"\r").unwrap_or(s))
        .unwrap_or(line)
}

/// Turn raw input bytes into a path without assuming UTF-8.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

/// Turn raw input bytes into a path without assuming UTF-8.
#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Resolve `input` into the files to play.
///
/// Single files are not checked for existence; a missing file surfaces when
/// its decoder is opened.
pub fn collect_paths(input: impl AsRef<Path>, config: &Config) -> Result<Collected> {
    let path = input.as_ref();
    if !path.is_dir() {
        return Ok(Collected {
            kind: InputKind::File,
            paths: vec![path.to_path_buf()],
            truncated: false,
        });
    }

    let entries = std::fs::read_dir(path).map_err(|source| PlayerError::DirectoryOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    let mut truncated = false;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("mp3play: skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };
        let name = entry.file_name();
        if !name.to_string_lossy().contains(NAME_FILTER) {
            continue;
        }
        if config.max_files.is_some_and(|cap| paths.len() >= cap) {
            truncated = true;
            break;
        }
        paths.push(path.join(&name));
    }

    if truncated {
        log::warn!("mp3play: {} ({}, kept {})", TRUNCATION_WARNING, path.display(), paths.len());
    }

    Ok(Collected {
        kind: InputKind::Directory,
        paths,
        truncated,
    })
}
