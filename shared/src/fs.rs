//! Filesystem helpers shared across the scenebake tools.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Maximum allowed size for a source or baked asset read into memory.
pub const MAX_ASSET_BYTES: u64 = 1024 * 1024 * 1024; // 1 GiB
/// Maximum allowed size for a batch manifest.
pub const MAX_MANIFEST_BYTES: u64 = 4 * 1024 * 1024; // 4 MiB

/// Read a file into memory with a size cap.
pub fn read_file_with_limit(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    let len = metadata.len();
    if len > max_bytes {
        anyhow::bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            len,
            max_bytes
        );
    }
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Express `path` relative to `root`, with `/` separators.
///
/// The computation is lexical: both paths are made absolute against the
/// current directory and `.`/`..` components are folded, but symlinks are
/// not resolved. A path outside `root` climbs out with `..` components.
pub fn relative_asset_path(path: &Path, root: &Path) -> Result<String> {
    let path = normalize(&absolute(path)?);
    let root = normalize(&absolute(root)?);

    let path_parts: Vec<Component> = path.components().collect();
    let root_parts: Vec<Component> = root.components().collect();

    let shared = path_parts
        .iter()
        .zip(root_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different drive prefixes have nothing in common to climb from.
    if shared == 0 {
        return Ok(to_forward_slashes(&path));
    }

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_string(), root_parts.len() - shared));
    parts.extend(
        path_parts[shared..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        return Ok(".".to_string());
    }
    Ok(parts.join("/"))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    Ok(cwd.join(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
