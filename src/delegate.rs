//! The boundary between the mutation testing loop and the outside world.

use std::fs::{self, File};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::Configuration;
use crate::copy_tree;
use crate::error::{MuterError, Result};
use crate::mutants::{AbortReason, TestSuiteOutcome};
use crate::report::{save_json_report, MuterTestReport};
use crate::safety;

pub const LOGS_DIR_NAME: &str = "muter_logs";

/// Everything the mutation testing loop needs from its environment.
///
/// File paths are relative to the project root.
pub trait TestingDelegate {
    /// `None` when no valid configuration is present.
    fn load_configuration(&mut self) -> Option<Configuration>;
    /// Prepare a copy of `directory` to run the mutants in.
    fn backup_project(&mut self, directory: &Utf8Path) -> Result<()>;
    fn backup_file(&mut self, path: &Utf8Path);
    /// Overwrite the whole file with `contents`.
    fn write_file(&mut self, path: &Utf8Path, contents: &str);
    /// Run the test suite once, keeping its output under `results_file_name`.
    fn run_test_suite(&mut self, results_file_name: &str) -> TestSuiteOutcome;
    /// Put back the exact bytes saved by [`TestingDelegate::backup_file`].
    fn restore_file(&mut self, path: &Utf8Path);
    /// Notification only; the caller decides what happens next.
    fn abort_testing(&mut self, reason: AbortReason);
    fn save_report(&mut self, report: &MuterTestReport, directory: &Utf8Path) -> Result<()>;
}

/// Compiler and interpreter messages that mean the mutant never ran.
const BUILD_ERROR_MARKERS: &[&str] = &[
    "error[E",
    "error: could not compile",
    "SyntaxError",
    "IndentationError",
    "ImportError",
    "ModuleNotFoundError",
    "error TS",
    "TSError",
    "BUILD FAILED",
];

/// Classify a finished test run. `exit_code` is `None` when the process was
/// killed by a signal.
pub fn classify_test_run(exit_code: Option<i32>, output: &str) -> TestSuiteOutcome {
    match exit_code {
        Some(0) => TestSuiteOutcome::Passed,
        Some(_) if BUILD_ERROR_MARKERS.iter().any(|marker| output.contains(marker)) => {
            TestSuiteOutcome::BuildError
        }
        Some(_) => TestSuiteOutcome::Failed,
        None => TestSuiteOutcome::RuntimeError,
    }
}

struct WorkingCopy {
    root: Utf8PathBuf,
    _temp_dir: tempfile::TempDir,
}

/// Runs mutants against a scratch copy of a project on disk.
pub struct ProjectDelegate {
    project_dir: Utf8PathBuf,
    run_id: String,
    configuration: Option<Configuration>,
    working_copy: Option<WorkingCopy>,
    /// Set when a file operation failed; the next test run cannot be trusted.
    poisoned: bool,
}

impl ProjectDelegate {
    pub fn new(project_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            run_id: format!("{:08x}", fastrand::u32(..)),
            configuration: None,
            working_copy: None,
            poisoned: false,
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Directory mutants are written to and tests run in.
    pub fn working_root(&self) -> &Utf8Path {
        match &self.working_copy {
            Some(copy) => &copy.root,
            None => &self.project_dir,
        }
    }

    pub fn logs_dir(&self) -> Utf8PathBuf {
        self.project_dir.join(LOGS_DIR_NAME).join(&self.run_id)
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        self.working_root().join(path)
    }

    fn poison(&mut self, action: &str, path: &Utf8Path, e: &dyn std::fmt::Display) {
        error!("Failed to {} {}: {}", action, path, e);
        self.poisoned = true;
    }

    fn open_log(&self, results_file_name: &str) -> Result<(File, Utf8PathBuf)> {
        let dir = self.logs_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(results_file_name);
        Ok((File::create(&path)?, path))
    }

    fn spawn_and_wait(
        &self,
        configuration: &Configuration,
        log: &File,
    ) -> std::io::Result<Option<ExitStatus>> {
        let mut child = Command::new(&configuration.executable)
            .args(&configuration.arguments)
            .current_dir(self.working_root())
            .stdin(Stdio::null())
            .stdout(log.try_clone()?)
            .stderr(log.try_clone()?)
            .spawn()?;

        let Some(timeout) = configuration.timeout_secs.map(Duration::from_secs) else {
            return child.wait().map(Some);
        };

        let start = Instant::now();
        loop {
            match child.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() > timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Ok(None);
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }
}

impl TestingDelegate for ProjectDelegate {
    fn load_configuration(&mut self) -> Option<Configuration> {
        if self.configuration.is_none() {
            match Configuration::load(&self.project_dir) {
                Ok(configuration) => self.configuration = Some(configuration),
                Err(e) => {
                    error!("{}", e);
                    return None;
                }
            }
        }
        self.configuration.clone()
    }

    fn backup_project(&mut self, directory: &Utf8Path) -> Result<()> {
        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("muter-{}-", self.run_id))
            .tempdir()?;
        let root = Utf8Path::from_path(temp_dir.path())
            .ok_or_else(|| MuterError::NonUtf8Path(temp_dir.path().display().to_string()))?
            .to_path_buf();

        copy_tree::copy_tree(directory, &root).map_err(|e| MuterError::WorkingCopy {
            path: directory.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Working copy of {} created at {}", directory, root);

        self.project_dir = directory.to_path_buf();
        self.working_copy = Some(WorkingCopy {
            root,
            _temp_dir: temp_dir,
        });
        Ok(())
    }

    fn backup_file(&mut self, path: &Utf8Path) {
        let file = self.resolve(path);
        if let Some(stale) = safety::check_interrupted_run(&file) {
            warn!("Restoring {} from a backup left by an interrupted run", file);
            if let Err(e) = safety::restore_from_backup(&file, &stale) {
                self.poison("restore", &file, &e);
                return;
            }
        }
        if let Err(e) = safety::backup_file(&file) {
            self.poison("back up", &file, &e);
        }
    }

    fn write_file(&mut self, path: &Utf8Path, contents: &str) {
        let file = self.resolve(path);
        match fs::write(&file, contents) {
            Ok(()) => safety::clear_pycache(&file),
            Err(e) => self.poison("write", &file, &e),
        }
    }

    fn run_test_suite(&mut self, results_file_name: &str) -> TestSuiteOutcome {
        if std::mem::take(&mut self.poisoned) {
            warn!("Skipping test run {:?} after a failed file operation", results_file_name);
            return TestSuiteOutcome::RuntimeError;
        }
        let Some(configuration) = self.configuration.clone() else {
            error!("Test suite run requested before a configuration was loaded");
            return TestSuiteOutcome::RuntimeError;
        };

        let (log, log_path) = match self.open_log(results_file_name) {
            Ok(log) => log,
            Err(e) => {
                error!("Failed to create log for {:?}: {}", results_file_name, e);
                return TestSuiteOutcome::RuntimeError;
            }
        };

        let outcome = match self.spawn_and_wait(&configuration, &log) {
            Ok(Some(status)) => {
                let output = fs::read(&log_path).unwrap_or_default();
                classify_test_run(status.code(), &String::from_utf8_lossy(&output))
            }
            Ok(None) => {
                warn!("Test run {:?} timed out", results_file_name);
                TestSuiteOutcome::RuntimeError
            }
            Err(e) => {
                error!("Failed to run {}: {}", configuration.executable, e);
                TestSuiteOutcome::RuntimeError
            }
        };
        debug!("Test run {:?} finished: {} (log: {})", results_file_name, outcome, log_path);
        outcome
    }

    fn restore_file(&mut self, path: &Utf8Path) {
        let file = self.resolve(path);
        let bak = safety::backup_path(&file);
        let restored = safety::restore_from_backup(&file, &bak).or_else(|e| {
            if self.working_copy.is_none() {
                return Err(e);
            }
            warn!("Failed to restore {} from backup ({}), copying the original", file, e);
            fs::copy(self.project_dir.join(path), &file).map(|_| safety::clear_pycache(&file))
        });
        if let Err(e) = restored {
            self.poison("restore", &file, &e);
        }
    }

    fn abort_testing(&mut self, reason: AbortReason) {
        warn!("Mutation testing aborted: {}", reason);
    }

    fn save_report(&mut self, report: &MuterTestReport, directory: &Utf8Path) -> Result<()> {
        let path = save_json_report(report, directory)?;
        info!("Report written to {}", path);
        Ok(())
    }
}
