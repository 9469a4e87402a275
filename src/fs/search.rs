//! Recursive content search: first matching line of every file under a base
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Default cap on the size of a file that will be searched (2 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// One search hit: the first line in `path` containing the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub preview: String,
}

/// Search every file under `base` for `query`, case-insensitively.
///
/// Files are visited in a stable order (entries sorted by name at every
/// level). Entries that cannot be read are skipped, as are files larger than
/// `max_file_bytes`, which are never opened. Symlinks to files are searched
/// but symlinked directories are not entered. At most one [`Match`] is
/// produced per file.
pub fn search(base: &Path, query: &str, max_file_bytes: u64) -> Vec<Match> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();
    let mut skipped = 0usize;

    let walker = WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok());

    for entry in walker {
        let Some(len) = file_len(&entry) else {
            continue;
        };
        if len > max_file_bytes {
            skipped += 1;
            continue;
        }
        if let Some(found) = first_match(entry.path(), &needle) {
            matches.push(found);
        }
    }

    info!(
        base = %base.display(),
        query,
        matches = matches.len(),
        skipped,
        "search finished"
    );
    matches
}

/// Size of the regular file behind `entry`, following a symlink to its
/// target. Directories, dangling links and links to directories give `None`.
fn file_len(entry: &DirEntry) -> Option<u64> {
    let meta = if entry.path_is_symlink() {
        fs::metadata(entry.path()).ok()?
    } else {
        entry.metadata().ok()?
    };
    meta.is_file().then(|| meta.len())
}

/// Return the first line of `path` containing `needle` (already lowercased).
fn first_match(path: &Path, needle: &str) -> Option<Match> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };

    bytes
        .split(|&b| b == b'\n')
        .enumerate()
        .find_map(|(idx, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);
            line.to_lowercase().contains(needle).then(|| Match {
                path: path.to_path_buf(),
                line: idx + 1,
                preview: line.into_owned(),
            })
        })
}
