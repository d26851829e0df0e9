//! Export file reading and discovery
//!
//! Reads export files into memory behind the same guards an upload form would
//! apply (extension, size, emptiness, binary sniffing), and locates the
//! followers/following files inside an unpacked data export.

use crate::config::LimitsConfig;
use crate::models::ExportKind;
use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Where the platform places connection exports inside an unpacked archive.
pub const CONNECTIONS_SUBDIR: &str = "connections/followers_and_following";

/// Followers exports are split into `followers_1.json`, `followers_2.json`, ...
pub const FOLLOWERS_PATTERN: &str = "followers*.json";

pub const FOLLOWING_FILE: &str = "following.json";

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{kind} file must be in .json format: {}", .path.display())]
    NotJson { kind: ExportKind, path: PathBuf },

    #[error(
        "{kind} file exceeds the maximum allowed size ({size} bytes > {limit} bytes): {}",
        .path.display()
    )]
    TooLarge {
        kind: ExportKind,
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("{kind} file is empty: {}", .path.display())]
    Empty { kind: ExportKind, path: PathBuf },

    #[error("{kind} file seems corrupted or is not a real JSON file: {}", .path.display())]
    Corrupt { kind: ExportKind, path: PathBuf },

    #[error("no {what} found in {}", .dir.display())]
    Missing { what: &'static str, dir: PathBuf },

    #[error("failed to read {kind} file {}", .path.display())]
    Io {
        kind: ExportKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Guards applied to every export before it is read into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    pub max_file_size_bytes: u64,
    pub sniff_bytes: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

impl From<&LimitsConfig> for InputLimits {
    fn from(config: &LimitsConfig) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes(),
            sniff_bytes: config.sniff_bytes,
        }
    }
}

/// Read one export file, rejecting anything an upload form would reject.
pub fn read_export(path: &Path, kind: ExportKind, limits: &InputLimits) -> Result<Vec<u8>, InputError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(InputError::NotJson { kind, path: path.to_path_buf() });
    }

    let io_err = |source: std::io::Error| InputError::Io { kind, path: path.to_path_buf(), source };

    let size = fs::metadata(path).map_err(io_err)?.len();
    if size > limits.max_file_size_bytes {
        return Err(InputError::TooLarge {
            kind,
            path: path.to_path_buf(),
            size,
            limit: limits.max_file_size_bytes,
        });
    }

    let bytes = fs::read(path).map_err(io_err)?;
    if bytes.is_empty() {
        return Err(InputError::Empty { kind, path: path.to_path_buf() });
    }
    if bytes.iter().take(limits.sniff_bytes).any(|&b| b == 0) {
        return Err(InputError::Corrupt { kind, path: path.to_path_buf() });
    }

    debug!(%kind, path = %path.display(), bytes = bytes.len(), "Read export file");
    Ok(bytes)
}

/// Paths of the exports found in an unpacked data archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFiles {
    /// All followers parts, sorted by path
    pub followers: Vec<PathBuf>,
    pub following: PathBuf,
}

/// Locate the followers and following exports under `dir`.
///
/// Both `dir` itself and its `connections/followers_and_following`
/// subdirectory are searched, in that order; the first location holding a
/// file wins for each export.
pub fn discover_exports(dir: &Path) -> Result<ExportFiles, InputError> {
    let candidates = [dir.to_path_buf(), dir.join(CONNECTIONS_SUBDIR)];

    let followers = candidates
        .iter()
        .map(|candidate| find_followers_parts(candidate))
        .find(|parts| !parts.is_empty())
        .ok_or_else(|| InputError::Missing {
            what: "followers export (followers*.json)",
            dir: dir.to_path_buf(),
        })?;

    let following = candidates
        .iter()
        .map(|candidate| candidate.join(FOLLOWING_FILE))
        .find(|path| path.is_file())
        .ok_or_else(|| InputError::Missing {
            what: "following export (following.json)",
            dir: dir.to_path_buf(),
        })?;

    info!(
        followers_parts = followers.len(),
        following = %following.display(),
        "Discovered export files"
    );

    Ok(ExportFiles { followers, following })
}

fn find_followers_parts(dir: &Path) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join(FOLLOWERS_PATTERN);

    let mut parts: Vec<PathBuf> = match glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths.flatten().filter(|path| path.is_file()).collect(),
        Err(e) => {
            debug!(error = %e, dir = %dir.display(), "Invalid followers glob pattern");
            Vec::new()
        }
    };
    parts.sort();
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn limits() -> InputLimits {
        InputLimits { max_file_size_bytes: 64, sniff_bytes: 8 }
    }

    #[test]
    fn test_read_export_accepts_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("followers_1.JSON");
        fs::write(&path, "[]").unwrap();
        let bytes = read_export(&path, ExportKind::Followers, &limits()).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_read_export_guards() {
        let dir = TempDir::new().unwrap();

        let txt = dir.path().join("followers.txt");
        fs::write(&txt, "[]").unwrap();
        assert!(matches!(
            read_export(&txt, ExportKind::Followers, &limits()),
            Err(InputError::NotJson { .. })
        ));

        let big = dir.path().join("big.json");
        fs::write(&big, vec![b' '; 65]).unwrap();
        assert!(matches!(
            read_export(&big, ExportKind::Following, &limits()),
            Err(InputError::TooLarge { size: 65, limit: 64, .. })
        ));

        let empty = dir.path().join("empty.json");
        fs::write(&empty, "").unwrap();
        assert!(matches!(
            read_export(&empty, ExportKind::Following, &limits()),
            Err(InputError::Empty { .. })
        ));

        let binary = dir.path().join("binary.json");
        fs::write(&binary, b"[\x00]").unwrap();
        assert!(matches!(
            read_export(&binary, ExportKind::Followers, &limits()),
            Err(InputError::Corrupt { .. })
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            read_export(&missing, ExportKind::Followers, &limits()),
            Err(InputError::Io { .. })
        ));
    }

    #[test]
    fn test_nul_after_sniff_window_is_allowed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("late_nul.json");
        fs::write(&path, b"[        \x00]").unwrap();
        assert!(read_export(&path, ExportKind::Followers, &limits()).is_ok());
    }

    #[test]
    fn test_discover_prefers_root_then_connections_dir() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join(CONNECTIONS_SUBDIR);
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("followers_2.json"), "[]").unwrap();
        fs::write(nested.join("followers_1.json"), "[]").unwrap();
        fs::write(nested.join("following.json"), "{}").unwrap();

        let found = discover_exports(dir.path()).unwrap();
        assert_eq!(
            found.followers,
            vec![nested.join("followers_1.json"), nested.join("followers_2.json")]
        );
        assert_eq!(found.following, nested.join("following.json"));
    }

    #[test]
    fn test_discover_reports_missing_exports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("followers_1.json"), "[]").unwrap();
        let err = discover_exports(dir.path()).unwrap_err();
        assert!(err.to_string().contains("following.json"));
    }
}
