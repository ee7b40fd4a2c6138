//! Builds the worklist: every mutation point of every enabled operator in a project.

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::copy_tree::should_skip;
use crate::detect_language;
use crate::error::{MuterError, Result};
use crate::mutants::{MutationOperatorInstance, MutationPoint};
use crate::operators::{DiscoveryPolicy, MutationOperatorKind};
use crate::syntax::SourceFile;

/// Source files under `root` in a supported language, relative to `root`, sorted.
///
/// Files below a language's test directories (`tests/`, `benches/` for Rust) are left out.
pub fn discover_source_files(
    root: &Utf8Path,
    exclude_list: &[String],
) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_str().is_some_and(should_skip)
        });

    for entry in walker {
        let entry = entry.map_err(|e| MuterError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(language) = detect_language(entry.path()) else {
            continue;
        };
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| MuterError::NonUtf8Path(entry.path().display().to_string()))?;
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        if language.grammar().is_in_test_directory(relative) {
            debug!("Skipping test file {}", relative);
            continue;
        }
        if exclude_list
            .iter()
            .any(|entry| !entry.is_empty() && relative.as_str().contains(entry.as_str()))
        {
            debug!("Excluded {}", relative);
            continue;
        }
        files.push(relative.to_path_buf());
    }

    files.sort();
    Ok(files)
}

/// Every mutation of `operators` in one file, in source order.
pub fn instances_in_source(
    relative_path: &Utf8Path,
    source: &str,
    operators: &[(MutationOperatorKind, DiscoveryPolicy)],
) -> Result<Vec<MutationOperatorInstance>> {
    let language = detect_language(relative_path.as_std_path()).ok_or_else(|| {
        MuterError::UnsupportedLanguage {
            path: relative_path.to_path_buf(),
        }
    })?;
    let file = SourceFile::parse(language, source, relative_path)?;

    let mut instances = Vec::new();
    for &(operator, policy) in operators {
        for position in operator.discover(&file, policy) {
            match operator.rewrite(&file, position) {
                Some(rewrite) => instances.push(MutationOperatorInstance::new(
                    MutationPoint::new(operator, relative_path, position),
                    rewrite,
                    file.shared_source(),
                )),
                None => warn!(
                    "{}: no {} rewrite at {}, skipping",
                    relative_path, operator, position
                ),
            }
        }
    }
    Ok(instances)
}

/// The full worklist for the project at `root`, sorted by file, position and operator.
///
/// Files are scanned in parallel. A file that cannot be read or parsed is skipped.
pub fn discover_mutation_instances(
    root: &Utf8Path,
    configuration: &Configuration,
) -> Result<Vec<MutationOperatorInstance>> {
    let files = discover_source_files(root, &configuration.exclude_list)?;
    let operators: Vec<(MutationOperatorKind, DiscoveryPolicy)> = configuration
        .enabled_operators()
        .into_iter()
        .map(|operator| (operator, configuration.policy_for(operator)))
        .collect();

    let mut instances: Vec<MutationOperatorInstance> = files
        .par_iter()
        .flat_map_iter(|relative| {
            let found = std::fs::read_to_string(root.join(relative))
                .map_err(MuterError::from)
                .and_then(|source| instances_in_source(relative, &source, &operators));
            match found {
                Ok(found) => found,
                Err(e) => {
                    warn!("Skipping {}: {}", relative, e);
                    Vec::new()
                }
            }
        })
        .collect();

    instances.sort_by(|a, b| {
        a.point
            .file_path
            .cmp(&b.point.file_path)
            .then_with(|| a.point.position.cmp(&b.point.position))
            .then_with(|| a.point.operator.cmp(&b.point.operator))
    });
    debug!("Discovered {} mutants in {} files", instances.len(), files.len());
    Ok(instances)
}
