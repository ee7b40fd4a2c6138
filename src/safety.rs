use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

pub fn backup_path(source_file: &Utf8Path) -> Utf8PathBuf {
    let name = format!(".{}.mutator.bak", source_file.file_name().unwrap_or_default());
    source_file.with_file_name(name)
}

/// Copy `source_file` next to itself so it can be restored byte for byte.
pub fn backup_file(source_file: &Utf8Path) -> std::io::Result<Utf8PathBuf> {
    let bak = backup_path(source_file);
    fs::copy(source_file, &bak)?;
    Ok(bak)
}

/// Check if a backup file exists from a previous interrupted run.
pub fn check_interrupted_run(source_file: &Utf8Path) -> Option<Utf8PathBuf> {
    let bak = backup_path(source_file);
    if bak.exists() { Some(bak) } else { None }
}

/// Restore source from its backup and remove the backup.
pub fn restore_from_backup(source_file: &Utf8Path, backup_file: &Utf8Path) -> std::io::Result<()> {
    fs::copy(backup_file, source_file)?;
    fs::remove_file(backup_file)?;
    clear_pycache(source_file);
    Ok(())
}

/// Remove the __pycache__ .pyc files for a given source file.
/// This forces Python to re-read the .py file on next import.
pub fn clear_pycache(source_file: &Utf8Path) {
    if source_file.extension() != Some("py") {
        return;
    }
    let (Some(parent), Some(stem)) = (source_file.parent(), source_file.file_stem()) else {
        return;
    };
    let Ok(entries) = parent.join("__pycache__").read_dir_utf8() else {
        return;
    };
    for entry in entries.flatten() {
        let name = entry.file_name();
        if name.starts_with(stem) && name.ends_with(".pyc") {
            let _ = fs::remove_file(entry.path());
        }
    }
}
