//! Kubernetes Downward API introspection.
//!
//! The orchestrator exposes pod metadata two ways: as environment variables named in
//! the pod spec and as files projected into a volume. Both are read fresh on every
//! call; nothing here caches or watches.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_VALUE;

/// Environment keys injected through `fieldRef`/`resourceFieldRef`, in report order.
pub const DOWNWARD_ENV_KEYS: [&str; 8] = [
    "MY_NODE_NAME",
    "MY_POD_NAME",
    "MY_POD_IP",
    "MY_POD_SERVICE_ACCOUNT",
    "MY_POD_LABEL_APP",
    "MY_POD_ANNOTATION_AUTHOR",
    "MY_POD_MEM_LIMIT_MB",
    "MY_POD_MEM_REQUEST_MB",
];

/// Source of environment variables.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Current value of every Downward API key, `"none"` when unset.
pub fn env_snapshot(env: &dyn EnvSource) -> Vec<(&'static str, String)> {
    DOWNWARD_ENV_KEYS
        .iter()
        .map(|&key| {
            (
                key,
                env.var(key).unwrap_or_else(|| DEFAULT_VALUE.to_string()),
            )
        })
        .collect()
}

/// A regular file found in the podinfo volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInfoFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PodInfoError {
    #[error("podinfo directory {path} does not exist")]
    Missing { path: PathBuf },

    #[error("failed to list podinfo directory {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PodInfoError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            PodInfoError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            PodInfoError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Entries of the podinfo directory, in listing order.
///
/// Failing to open the directory is an error. A failure partway through the
/// listing is logged and the entries seen so far are kept.
async fn podinfo_entries(dir: &Path) -> Result<Vec<std::fs::DirEntry>, PodInfoError> {
    let owned = dir.to_path_buf();
    let listing = tokio::task::spawn_blocking(move || {
        std::fs::read_dir(&owned).map(|entries| collect_entries(&owned, entries))
    })
    .await
    .map_err(|e| PodInfoError::Read {
        path: dir.to_path_buf(),
        source: io::Error::other(e),
    })?;

    listing.map_err(|e| PodInfoError::from_io(dir, e))
}

fn collect_entries<T>(dir: &Path, entries: impl Iterator<Item = io::Result<T>>) -> Vec<T> {
    let mut collected = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => collected.push(entry),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Podinfo listing interrupted");
                break;
            }
        }
    }
    collected
}

/// Names of all entries in the podinfo directory, in listing order.
pub async fn list_podinfo(dir: &Path) -> Result<Vec<String>, PodInfoError> {
    Ok(podinfo_entries(dir)
        .await?
        .iter()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect())
}

/// Read every regular file in the podinfo directory.
///
/// Kubernetes projects each item as a symlink into a timestamped `..data`
/// directory, so file type is taken from the link target. Directories and
/// dangling links are skipped. A file that cannot be read is logged and skipped;
/// only a failure to open the directory itself is returned.
pub async fn read_podinfo(dir: &Path) -> Result<Vec<PodInfoFile>, PodInfoError> {
    let mut files = Vec::new();
    for entry in podinfo_entries(dir).await? {
        let path = entry.path();
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping podinfo entry");
                continue;
            }
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => files.push(PodInfoFile { path, content }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read podinfo file");
            }
        }
    }
    Ok(files)
}

/// Render text as a bracketed list of quoted lines, terminators included.
///
/// `"a\nb"` becomes `['a\n', 'b']`, which keeps multi-line files on one report line.
pub fn render_lines(content: &str) -> String {
    let mut out = String::from("[");
    for (i, line) in content.split_inclusive('\n').enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        push_quoted(&mut out, line);
    }
    out.push(']');
    out
}

fn push_quoted(out: &mut String, s: &str) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
