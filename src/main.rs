use muter::command::{self, RunOptions};
use muter::copy_tree;
use muter::output;
use muter::report::xcode_report;
use muter::{MuterError, ProjectDelegate};

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "muter",
    version,
    about = "Mutation testing for Rust, Python and JavaScript/TypeScript projects"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create muter.conf.json in the project directory
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
        /// Project directory (default: current directory)
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Run mutation testing on the project
    Run {
        /// Save muter-report.json in the project directory
        #[arg(long)]
        output_json: bool,
        /// Print a warning for every surviving mutant in IDE diagnostic format
        #[arg(long)]
        output_xcode: bool,
        /// Project directory (default: nearest directory holding muter.conf.json)
        #[arg(long, env = "MUTER_PROJECT")]
        project: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Init { force, project } => cmd_init(project, force),
        Commands::Run {
            output_json,
            output_xcode,
            project,
        } => cmd_run(
            project,
            RunOptions {
                output_json,
                output_xcode,
            },
        ),
    };

    process::exit(exit_code);
}

fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_project(project: Option<PathBuf>, search_upwards: bool) -> Result<Utf8PathBuf> {
    let dir = match project {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read the current directory")?,
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("project directory {} not found", dir.display()))?;
    let dir = Utf8PathBuf::from_path_buf(dir)
        .map_err(|dir| MuterError::NonUtf8Path(dir.display().to_string()))?;

    if search_upwards {
        Ok(copy_tree::find_project_root(&dir))
    } else {
        Ok(dir)
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<MuterError>() {
        Some(MuterError::Configuration { .. } | MuterError::ConfigurationMissing) => 2,
        _ => 1,
    }
}

fn cmd_init(project: Option<PathBuf>, force: bool) -> i32 {
    let result = resolve_project(project, false)
        .and_then(|dir| command::init(&dir, force).map_err(anyhow::Error::from));
    match result {
        Ok(path) => {
            output::print_success(&format!("Created {}", path));
            0
        }
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            exit_code_for(&e)
        }
    }
}

fn cmd_run(project: Option<PathBuf>, options: RunOptions) -> i32 {
    let explicit = project.is_some();
    let result = resolve_project(project, !explicit).and_then(|dir| {
        let mut delegate = ProjectDelegate::new(dir.clone());
        let summary = command::run(&mut delegate, &dir, options)?;
        Ok((dir, summary))
    });

    let (dir, summary) = match result {
        Ok(done) => done,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            return exit_code_for(&e);
        }
    };

    if let Some(reason) = summary.aborted {
        output::print_error(&format!("Mutation testing aborted: {}", reason));
    }
    if options.output_xcode {
        let diagnostics = xcode_report(&summary.report.outcomes, &dir);
        if !diagnostics.is_empty() {
            println!("{}", diagnostics);
        }
    } else if !options.output_json {
        output::print_report(&summary.report);
    }
    0
}
