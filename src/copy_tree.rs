use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::CONFIG_FILE_NAME;
use crate::error::{MuterError, Result};
use crate::report::REPORT_FILE_NAME;

const SKIP_NAMES: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    ".venv",
    "venv",
    "__pycache__",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    "target",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "muter_logs",
    REPORT_FILE_NAME,
];

const SKIP_SUFFIXES: &[&str] = &[".mutator.bak", ".pyc", ".pyo"];

/// Whether a directory entry named `name` is left out of working copies and discovery.
pub fn should_skip(name: &str) -> bool {
    SKIP_NAMES.iter().any(|s| *s == name) || SKIP_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn copy_dir_filtered(src: &Utf8Path, dst: &Utf8Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in src.read_dir_utf8()? {
        let entry = entry?;
        if should_skip(entry.file_name()) {
            continue;
        }
        let dst_path = dst.join(entry.file_name());
        let ft = entry.file_type()?;
        if ft.is_dir() {
            copy_dir_filtered(entry.path(), &dst_path)?;
        } else if ft.is_file() {
            fs::copy(entry.path(), &dst_path)?;
        }
        // Skip symlinks and other special files
    }
    Ok(())
}

/// Find the project root by walking up from `start` looking for markers.
///
/// A directory holding `muter.conf.json` wins over build-system markers.
pub fn find_project_root(start: &Utf8Path) -> Utf8PathBuf {
    let markers = &[
        CONFIG_FILE_NAME,
        "pyproject.toml",
        "setup.py",
        "setup.cfg",
        "package.json",
        "Cargo.toml",
        ".git",
    ];
    for marker in markers {
        let mut dir = start;
        loop {
            if dir.join(marker).exists() {
                return dir.to_path_buf();
            }
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => break,
            }
        }
    }
    start.to_path_buf()
}

/// Copy the project tree into `dest_root`.
pub fn copy_tree(project_root: &Utf8Path, dest_root: &Utf8Path) -> Result<()> {
    if !project_root.is_dir() {
        return Err(MuterError::WorkingCopy {
            path: project_root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }
    copy_dir_filtered(project_root, dest_root)
}
