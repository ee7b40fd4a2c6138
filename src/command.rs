//! The `init` and `run` pipelines behind the CLI subcommands.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use crate::config::{Configuration, CONFIG_FILE_NAME};
use crate::delegate::TestingDelegate;
use crate::discovery::discover_mutation_instances;
use crate::error::{MuterError, Result};
use crate::mutants::AbortReason;
use crate::report::MuterTestReport;
use crate::runner::perform_mutation_testing;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Save `muter-report.json` in the project directory.
    pub output_json: bool,
    /// Print IDE diagnostics for surviving mutants.
    pub output_xcode: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub report: MuterTestReport,
    /// Set when the run stopped early. The report is then empty.
    pub aborted: Option<AbortReason>,
}

/// Write the template configuration into `directory`.
pub fn init(directory: &Utf8Path, force: bool) -> Result<Utf8PathBuf> {
    let path = directory.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(MuterError::Configuration {
            path,
            reason: "file already exists, pass --force to overwrite it".to_string(),
        });
    }
    std::fs::write(&path, Configuration::template().to_pretty_json()?)?;
    Ok(path)
}

/// Load the configuration, prepare the working copy, discover mutants, test
/// them and build the report.
///
/// An aborted run is not an error: it yields an empty report and the reason.
pub fn run<D: TestingDelegate + ?Sized>(
    delegate: &mut D,
    project_dir: &Utf8Path,
    options: RunOptions,
) -> Result<RunSummary> {
    let configuration = delegate
        .load_configuration()
        .ok_or(MuterError::ConfigurationMissing)?;

    delegate.backup_project(project_dir)?;

    let worklist = discover_mutation_instances(project_dir, &configuration)?;
    info!("Discovered {} mutants in {}", worklist.len(), project_dir);

    let (outcomes, aborted) = match perform_mutation_testing(&worklist, delegate) {
        Ok(outcomes) => (outcomes, None),
        Err(reason) => (Vec::new(), Some(reason)),
    };

    let report = MuterTestReport::new(outcomes);
    if options.output_json {
        delegate.save_report(&report, project_dir)?;
    }

    Ok(RunSummary { report, aborted })
}
