use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cmdtree::{compile, overlay};
use cmdtree_core::commands::dump::TreeDumper;
use cmdtree_core::commands::link::Linker;
use cmdtree_core::commands::CommandTree;
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostics::{Logger, TracingLogger};
use cmdtree_core::element::Element;
use cmdtree_core::manifest::Manifest;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Command grammar compiler
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Compiler config, created with defaults if missing.
    #[arg(long, default_value = "Cmdtree.toml")]
    config: PathBuf,

    /// Also write logs to a daily rotated file in this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a manifest and report diagnostics.
    Check { manifest: PathBuf },
    /// Compile a manifest, merge it over a destination and print the tree.
    Tree {
        manifest: PathBuf,

        /// Manifest whose commands form the tree being merged into.
        #[arg(long)]
        destination: Option<PathBuf>,
    },
}

fn setup_logging(log_dir: Option<&Path>) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("CMDTREE_LOG")
        .from_env_lossy();
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match log_dir {
        Some(dir) => {
            let logfile = tracing_appender::rolling::daily(dir, "cmdtree.log");
            builder.with_writer(logfile.and(std::io::stderr)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
}

fn load_elements(path: &Path) -> Result<Vec<Element>> {
    let manifest =
        Manifest::load(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(manifest.into_elements()?)
}

/// Compiles a manifest, returning `None` when errors were reported.
fn compile_manifest(path: &Path, config: &CompilerConfig) -> Result<Option<CommandTree>> {
    let elements = load_elements(path)?;
    let compiled = compile(&elements, config, &Linker::new(), TracingLogger::new());
    info!(
        manifest = %path.display(),
        errors = compiled.logger.error_count(),
        warnings = compiled.logger.warning_count(),
        "compiled manifest"
    );
    Ok((!compiled.logger.has_errors()).then_some(compiled.tree))
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    setup_logging(args.log_dir.as_deref());

    let config = CompilerConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    match args.command {
        Command::Check { manifest } => match compile_manifest(&manifest, &config)? {
            Some(_) => Ok(ExitCode::SUCCESS),
            None => Ok(ExitCode::FAILURE),
        },
        Command::Tree {
            manifest,
            destination,
        } => {
            let Some(source) = compile_manifest(&manifest, &config)? else {
                return Ok(ExitCode::FAILURE);
            };
            let destination = match destination {
                Some(path) => match compile_manifest(&path, &config)? {
                    Some(tree) => tree,
                    None => return Ok(ExitCode::FAILURE),
                },
                None => CommandTree::new(),
            };

            let merged = overlay(&destination, &source, &config);
            print!("{}", TreeDumper::new(&merged));
            Ok(ExitCode::SUCCESS)
        }
    }
}
