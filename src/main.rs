//! Command-line front end: `glmscript generate` and `glmscript check`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use glmscript::{CodeGenerator, ModelDescription, RRuntime, Settings, StatisticalModel};

#[derive(Parser, Debug)]
#[command(name = "glmscript", version, about = "Generate R scripts for GLM/GLMM fits")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an R script from a JSON model description
    Generate {
        /// Model description (JSON)
        model: PathBuf,

        /// CSV file the script should read; overrides the description's `data`
        #[arg(long)]
        data: Option<PathBuf>,

        /// Directory to write the script into; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// Settings file (JSON) with formula and generator options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Warn about model variables missing from the CSV header
        #[arg(long)]
        verify_data: bool,

        /// Parse the written script with Rscript (requires --out)
        #[arg(long, requires = "out")]
        check: bool,
    },

    /// Check that an R script parses
    Check {
        script: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate {
            model,
            data,
            out,
            config,
            verify_data,
            check,
        } => generate(&model, data, out, config, verify_data, check),
        Command::Check { script } => check_script(&script),
    }
}

fn generate(
    model_path: &Path,
    data: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    verify_data: bool,
    check: bool,
) -> Result<()> {
    let settings = match &config {
        Some(path) => Settings::from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let description = ModelDescription::from_path(model_path)
        .with_context(|| format!("reading model description {}", model_path.display()))?;
    let model = StatisticalModel::with_convention(&description, settings.formula.clone())
        .with_context(|| format!("invalid model in {}", model_path.display()))?;

    let data = data.or_else(|| description.data.clone());
    let generator = CodeGenerator::try_new(&model, data.as_deref())
        .context("unsupported data file")?
        .with_config(settings.generator)
        .context("invalid generator settings")?;

    if verify_data {
        match generator.data() {
            Some(source) => {
                let missing = source
                    .missing_columns(&model)
                    .context("reading data header")?;
                if !missing.is_empty() {
                    warn!(path = %source.path().display(), ?missing, "data file lacks model variables");
                }
            }
            None => warn!("--verify-data given without a data file"),
        }
    }

    match out {
        Some(dir) => {
            let path = generator
                .write_out_file(&dir)
                .with_context(|| format!("writing script into {}", dir.display()))?;
            println!("{}", path.display());

            if check {
                check_script(&path)?;
            }
        }
        None => {
            let script = generator.script().context("generating script")?;
            print!("{}", script);
        }
    }

    Ok(())
}

fn check_script(script: &Path) -> Result<()> {
    let runtime = RRuntime::locate()?;
    let outcome = runtime
        .check_syntax(script)
        .with_context(|| format!("checking {}", script.display()))?;

    if !outcome.success() {
        bail!(
            "{} does not parse:\n{}",
            script.display(),
            outcome.stderr.trim_end()
        );
    }

    info!(script = %script.display(), "script parses");
    Ok(())
}
